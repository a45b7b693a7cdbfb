//! # tts-smoke
//!
//! 本地语音合成服务（OpenAI 兼容接口）的冒烟测试客户端。
//!
//! Smoke-test client for locally running, OpenAI-compatible speech synthesis
//! services such as IndexTTS2.
//!
//! ## Overview
//!
//! A run submits text to `POST /v1/audio/speech`, streams the returned audio
//! to a file and prints a human-readable verdict. An optional pre-flight
//! (`GET /v1/models`) reports whether the configured model is served.
//! Failures never abort a run: each one is reported and the next case runs.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use tts_smoke::report::Reporter;
//! use tts_smoke::runner::run_suite;
//! use tts_smoke::suite::Suite;
//! use tts_smoke::SpeechClient;
//!
//! fn main() -> tts_smoke::Result<()> {
//!     let client = SpeechClient::builder()
//!         .base_url("http://127.0.0.1:7881")
//!         .api_key("123456")
//!         .model("index-tts2")
//!         .timeout(Duration::from_secs(120))
//!         .build()?;
//!
//!     let mut reporter = Reporter::new(std::io::stdout());
//!     let summary = run_suite(&client, &Suite::japanese_cross_lingual(), &mut reporter)?;
//!     println!("{} of {} cases passed", summary.succeeded(), summary.total());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Explicit client configuration and endpoint resolution |
//! | [`tts`] | Blocking speech client, payload types, audio persistence |
//! | [`preflight`] | Advisory model-availability check |
//! | [`hints`] | Remediation hints for recognizable error responses |
//! | [`report`] | Console rendering of outcomes |
//! | [`suite`] | Built-in and YAML-defined test-case tables |
//! | [`runner`] | Single-shot and suite flows |

pub mod config;
pub mod hints;
pub mod preflight;
pub mod report;
pub mod runner;
pub mod suite;
pub mod tts;

pub use config::ClientConfig;
pub use tts::{SavedAudio, SpeechClient, SpeechRequest, SynthesisJob};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
