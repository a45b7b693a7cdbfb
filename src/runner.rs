//! Smoke-run flows built on [`SpeechClient`].
//!
//! Per-case failures are reported and recorded, never propagated: the only
//! error these functions return is a failure to write the report itself.

use crate::config::{MODELS_PATH, SPEECH_PATH};
use crate::preflight::{check_models, ModelCheck};
use crate::report::Reporter;
use crate::suite::Suite;
use crate::tts::{normalize_voice, SavedAudio, SpeechClient, SynthesisJob};
use crate::Result;
use std::io::Write;
use tracing::info;

/// Outcome of one suite case.
#[derive(Debug)]
pub struct CaseReport {
    pub label: String,
    pub result: Result<SavedAudio>,
}

/// Outcomes of a suite run, in case order.
#[derive(Debug, Default)]
pub struct SuiteSummary {
    pub cases: Vec<CaseReport>,
}

impl SuiteSummary {
    pub fn total(&self) -> usize {
        self.cases.len()
    }

    pub fn succeeded(&self) -> usize {
        self.cases.iter().filter(|c| c.result.is_ok()).count()
    }

    pub fn all_succeeded(&self) -> bool {
        self.succeeded() == self.total()
    }
}

/// Run the advisory model check and report it.
pub fn run_preflight<W: Write>(
    client: &SpeechClient,
    reporter: &mut Reporter<W>,
) -> Result<Option<ModelCheck>> {
    reporter.preflight_start(&client.config().endpoint(MODELS_PATH))?;
    let check = check_models(client);
    reporter.preflight(&check)?;
    Ok(check.ok())
}

/// List the served models, marking the configured one.
pub fn run_models<W: Write>(
    client: &SpeechClient,
    reporter: &mut Reporter<W>,
) -> Result<Option<Vec<String>>> {
    reporter.models_start(&client.config().endpoint(MODELS_PATH))?;
    let listing = client.list_models();
    reporter.models(&listing, client.model())?;
    Ok(listing.ok())
}

/// Synthesize a single job, optionally preceded by the model check.
pub fn run_single<W: Write>(
    client: &SpeechClient,
    job: &SynthesisJob,
    preflight: bool,
    reporter: &mut Reporter<W>,
) -> Result<Result<SavedAudio>> {
    if preflight {
        run_preflight(client, reporter)?;
    }
    reporter.attempt(
        &client.config().endpoint(SPEECH_PATH),
        &normalize_voice(&job.voice),
    )?;
    let result = client.synthesize_to_file(job);
    reporter.outcome(&result, &client.config().authority())?;
    Ok(result)
}

/// Run every case of `suite` in order, continuing past failures.
pub fn run_suite<W: Write>(
    client: &SpeechClient,
    suite: &Suite,
    reporter: &mut Reporter<W>,
) -> Result<SuiteSummary> {
    let authority = client.config().authority();
    reporter.line(format!(
        "[-] Running {} case(s) against {} (model {})",
        suite.cases.len(),
        client.config().base_url,
        client.model()
    ))?;
    reporter.line(format!("[-] Reference voice: {}", normalize_voice(&suite.voice)))?;
    reporter.separator()?;

    let mut summary = SuiteSummary::default();
    for (case, job) in suite.jobs() {
        reporter.case_start(&case.label)?;
        let result = client.synthesize_to_file(&job);
        reporter.outcome(&result, &authority)?;
        reporter.separator()?;
        info!(label = %case.label, ok = result.is_ok(), "suite case finished");
        summary.cases.push(CaseReport {
            label: case.label.clone(),
            result,
        });
    }

    reporter.summary(summary.succeeded(), summary.total())?;
    Ok(summary)
}
