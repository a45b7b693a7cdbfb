//! Model-availability preflight
//!
//! Advisory only: the outcome is reported, never used to stop a run.

use crate::tts::SpeechClient;
use crate::Result;
use std::collections::BTreeSet;
use tracing::debug;

/// Result of comparing the served models with the configured one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCheck {
    pub target: String,
    pub available: BTreeSet<String>,
}

impl ModelCheck {
    pub fn new(target: impl Into<String>, available: impl IntoIterator<Item = String>) -> Self {
        Self {
            target: target.into(),
            available: available.into_iter().collect(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.available.contains(&self.target)
    }
}

/// Ask the service which models it serves and check for the configured one.
pub fn check_models(client: &SpeechClient) -> Result<ModelCheck> {
    let ids = client.list_models()?;
    debug!(count = ids.len(), "service listed models");
    Ok(ModelCheck::new(client.model(), ids))
}
