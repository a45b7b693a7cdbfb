//! tts-smoke — 本地语音合成接口冒烟测试命令行工具
//!
//! Usage:
//!   tts-smoke models                         Check which models the service serves
//!   tts-smoke speak [--text ..] [--voice ..] Synthesize one sentence to a file
//!   tts-smoke suite [--builtin japanese]     Run a multilingual case table
//!
//! Per-case failures are reported on stdout and never change the exit status.

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tts_smoke::config::{
    DEFAULT_API_KEY, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_OUTPUT, DEFAULT_TEXT,
    DEFAULT_TIMEOUT_SECS, DEFAULT_VOICE,
};
use tts_smoke::report::Reporter;
use tts_smoke::runner::{run_models, run_preflight, run_single, run_suite};
use tts_smoke::suite::Suite;
use tts_smoke::{ClientConfig, SpeechClient, SynthesisJob};

#[derive(Debug, Parser)]
#[command(name = "tts-smoke")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Smoke-test a local OpenAI-compatible speech synthesis API")]
struct Cli {
    #[command(flatten)]
    service: ServiceArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct ServiceArgs {
    /// Service root URL
    #[arg(long, global = true, env = "TTS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Bearer token sent with every request
    #[arg(
        long,
        global = true,
        env = "TTS_API_KEY",
        default_value = DEFAULT_API_KEY,
        hide_env_values = true
    )]
    api_key: String,

    /// Model identifier to request
    #[arg(long, global = true, env = "TTS_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Per-request timeout in seconds
    #[arg(
        long,
        global = true,
        env = "TTS_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    timeout_secs: u64,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List served models and check that the configured one is among them
    Models,

    /// Synthesize one sentence and save it
    Speak {
        /// Text to synthesize
        #[arg(long, default_value = DEFAULT_TEXT)]
        text: String,

        /// Reference voice filename (resolved by the service)
        #[arg(long, env = "TTS_VOICE", default_value = DEFAULT_VOICE)]
        voice: String,

        /// Where to write the audio
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Skip the model-availability check
        #[arg(long)]
        skip_preflight: bool,
    },

    /// Run a table of test cases, one file per case
    Suite {
        /// Built-in suite name (default, japanese)
        #[arg(long, default_value = "japanese", conflicts_with = "file")]
        builtin: String,

        /// YAML suite file
        #[arg(long)]
        file: Option<PathBuf>,

        /// Override the suite's reference voice
        #[arg(long)]
        voice: Option<String>,

        /// Directory for relative output paths
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Run the model-availability check first
        #[arg(long)]
        preflight: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::new(
        &cli.service.base_url,
        cli.service.api_key.clone(),
        cli.service.model.clone(),
        Duration::from_secs(cli.service.timeout_secs),
    )?;
    debug!(base_url = %config.base_url, model = %config.model, "configured service");
    let client = SpeechClient::from_config(config)?;
    let mut reporter = Reporter::new(std::io::stdout().lock());

    match cli.command {
        Command::Models => {
            run_models(&client, &mut reporter)?;
            Ok(())
        }
        Command::Speak {
            text,
            voice,
            output,
            skip_preflight,
        } => {
            let job = SynthesisJob::new(text, voice, output);
            // The outcome is already on stdout; it never changes the exit status.
            let _ = run_single(&client, &job, !skip_preflight, &mut reporter)?;
            Ok(())
        }
        Command::Suite {
            builtin,
            file,
            voice,
            output_dir,
            preflight,
        } => {
            let mut suite = match file {
                Some(path) => Suite::load(&path)
                    .with_context(|| format!("loading suite {}", path.display()))?,
                None => Suite::builtin(&builtin).ok_or_else(|| {
                    anyhow!(
                        "unknown built-in suite '{}' (available: {})",
                        builtin,
                        Suite::builtin_names().join(", ")
                    )
                })?,
            };
            if let Some(voice) = voice {
                suite = suite.with_voice(voice)?;
            }
            if let Some(dir) = output_dir {
                suite = suite.with_output_dir(&dir);
            }
            if preflight {
                run_preflight(&client, &mut reporter)?;
            }
            run_suite(&client, &suite, &mut reporter)?;
            Ok(())
        }
    }
}
