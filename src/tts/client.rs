//! TTS (Text-to-Speech) client.

use super::types::{normalize_voice, SavedAudio, SpeechRequest, SynthesisJob};
use crate::config::{ClientConfig, MODELS_PATH, SPEECH_PATH};
use crate::{Error, ErrorContext, Result};
use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Blocking client for one speech service instance.
pub struct SpeechClient {
    http_client: Client,
    config: ClientConfig,
}

impl SpeechClient {
    pub fn builder() -> SpeechClientBuilder {
        SpeechClientBuilder::new()
    }

    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                Error::configuration_with_context(
                    format!("Failed to create HTTP client: {}", e),
                    ErrorContext::new().with_source("speech_client"),
                )
            })?;
        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Build the request payload for `text` spoken with `voice`.
    pub fn request(&self, text: &str, voice: &str) -> SpeechRequest {
        SpeechRequest::new(&self.config.model, text, normalize_voice(voice))
    }

    /// `GET /v1/models` and return the advertised model ids in server order.
    pub fn list_models(&self) -> Result<Vec<String>> {
        #[derive(Deserialize)]
        struct ModelList {
            data: Vec<ModelDescriptor>,
        }
        #[derive(Deserialize)]
        struct ModelDescriptor {
            id: String,
        }

        let url = self.config.endpoint(MODELS_PATH);
        debug!(url = %url, "listing models");
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .map_err(|e| Error::from_transport(e, &url, self.config.timeout))?;
        let response = self.check_status(response, &url)?;
        let body = response
            .text()
            .map_err(|e| Error::from_transport(e, &url, self.config.timeout))?;
        let list: ModelList = serde_json::from_str(&body)?;
        Ok(list.data.into_iter().map(|m| m.id).collect())
    }

    /// Send one synthesis request and return the successful response.
    ///
    /// Only `200 OK` carries audio; any other status, 2xx included, is an
    /// [`Error::Status`]. The body is left unread so callers can stream it.
    pub fn synthesize(&self, request: &SpeechRequest) -> Result<Response> {
        let url = self.config.endpoint(SPEECH_PATH);
        debug!(
            url = %url,
            model = %request.model,
            voice = %request.voice,
            input_len = request.input.chars().count(),
            "sending speech request"
        );
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .map_err(|e| Error::from_transport(e, &url, self.config.timeout))?;
        if response.status() != StatusCode::OK {
            return Err(status_error(response, &url));
        }

        let expected = request.response_format.mime_type();
        if let Some(ct) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !ct.starts_with("audio/") && !ct.starts_with("application/octet-stream") {
                warn!(content_type = ct, expected, "speech response is not audio");
            }
        }
        Ok(response)
    }

    /// Synthesize `job` and stream the audio verbatim to `job.output`.
    ///
    /// The output path is only touched once the service has answered 200.
    /// Bytes land in a sibling `.part` file first and are renamed over the
    /// destination when the transfer completes.
    pub fn synthesize_to_file(&self, job: &SynthesisJob) -> Result<SavedAudio> {
        let request = self.request(&job.text, &job.voice);
        let mut response = self.synthesize(&request)?;
        let bytes = persist(&mut response, &job.output).map_err(|e| {
            Error::from_body_io(e, &self.config.endpoint(SPEECH_PATH), self.config.timeout)
        })?;
        info!(path = %job.output.display(), bytes, "saved synthesized audio");
        Ok(SavedAudio {
            path: job.output.clone(),
            bytes,
        })
    }

    fn check_status(&self, response: Response, url: &str) -> Result<Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(status_error(response, url))
        }
    }
}

fn status_error(response: Response, url: &str) -> Error {
    let status = response.status().as_u16();
    let body = response
        .text()
        .unwrap_or_else(|e| format!("<unreadable body: {}>", e));
    warn!(url, status, "service returned an error status");
    Error::Status { status, body }
}

/// Stream `reader` to `path`, replacing any existing file.
fn persist(reader: &mut impl std::io::Read, path: &Path) -> std::io::Result<u64> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let partial = partial_path(path);
    let written = write_partial(reader, &partial).and_then(|n| {
        fs::rename(&partial, path)?;
        Ok(n)
    });
    if written.is_err() {
        let _ = fs::remove_file(&partial);
    }
    written
}

fn write_partial(reader: &mut impl std::io::Read, partial: &Path) -> std::io::Result<u64> {
    let mut writer = BufWriter::new(File::create(partial)?);
    let n = std::io::copy(reader, &mut writer)?;
    writer.flush()?;
    Ok(n)
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}

pub struct SpeechClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    timeout: Option<Duration>,
}

impl SpeechClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            model: None,
            timeout: None,
        }
    }
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<SpeechClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::configuration("Base URL must be specified"))?;
        let api_key = self
            .api_key
            .ok_or_else(|| Error::configuration("API key must be specified"))?;
        let model = self
            .model
            .ok_or_else(|| Error::configuration("Model must be specified"))?;
        let timeout = self.timeout.ok_or_else(|| {
            Error::configuration_with_context(
                "Timeout must be specified",
                ErrorContext::new().with_field_path("config.timeout"),
            )
        })?;
        SpeechClient::from_config(ClientConfig::new(&base_url, api_key, model, timeout)?)
    }
}

impl Default for SpeechClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
