//! Client configuration
//!
//! Everything a run needs is carried in an explicit [`ClientConfig`] handed to
//! the client at construction time. The defaults mirror a stock local
//! IndexTTS2 deployment.

use crate::{Error, ErrorContext, Result};
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:7880";
pub const DEFAULT_API_KEY: &str = "123456";
pub const DEFAULT_MODEL: &str = "index-tts2";
pub const DEFAULT_VOICE: &str = "default.wav";
pub const DEFAULT_OUTPUT: &str = "test_result.wav";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_TEXT: &str = "你好，这是一段测试语音，用来验证本地API接口是否响应正常。";

pub const MODELS_PATH: &str = "/v1/models";
pub const SPEECH_PATH: &str = "/v1/audio/speech";

/// Connection settings for one speech service instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: Url,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Build a config, validating the base URL.
    ///
    /// The timeout has no fallback value: callers choose it.
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = parse_base_url(base_url)?;
        let model = model.into();
        if model.trim().is_empty() {
            return Err(Error::configuration_with_context(
                "model identifier must not be empty",
                ErrorContext::new().with_field_path("config.model"),
            ));
        }
        if timeout.is_zero() {
            return Err(Error::configuration_with_context(
                "timeout must be greater than zero",
                ErrorContext::new().with_field_path("config.timeout"),
            ));
        }
        Ok(Self {
            base_url,
            api_key: api_key.into(),
            model,
            timeout,
        })
    }

    /// Resolve an absolute endpoint path (e.g. `/v1/models`) against the base URL.
    ///
    /// A path prefix on the base URL is preserved, so `http://host/proxy`
    /// resolves `/v1/models` to `http://host/proxy/v1/models`.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }

    /// `host:port` of the service, used in connectivity hints.
    pub fn authority(&self) -> String {
        let host = self.base_url.host_str().unwrap_or("localhost");
        match self.base_url.port_or_known_default() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| {
        Error::configuration_with_context(
            format!("invalid base URL '{}'", raw),
            ErrorContext::new()
                .with_field_path("config.base_url")
                .with_details(e.to_string()),
        )
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::configuration_with_context(
            format!("unsupported URL scheme '{}'", other),
            ErrorContext::new()
                .with_field_path("config.base_url")
                .with_details("expected http or https"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base: &str) -> ClientConfig {
        ClientConfig::new(base, "k", "index-tts2", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        assert_eq!(
            config("http://127.0.0.1:7880/").endpoint(SPEECH_PATH),
            "http://127.0.0.1:7880/v1/audio/speech"
        );
        assert_eq!(
            config("http://127.0.0.1:7880").endpoint("v1/models"),
            "http://127.0.0.1:7880/v1/models"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        assert_eq!(
            config("http://gateway.local/tts").endpoint(MODELS_PATH),
            "http://gateway.local/tts/v1/models"
        );
    }

    #[test]
    fn test_authority_uses_known_default_port() {
        assert_eq!(config("http://127.0.0.1:7881").authority(), "127.0.0.1:7881");
        assert_eq!(config("https://tts.example").authority(), "tts.example:443");
    }

    #[test]
    fn test_rejects_bad_settings() {
        let bad_url = ClientConfig::new("not a url", "k", "m", Duration::from_secs(1));
        assert!(matches!(bad_url, Err(Error::Configuration { .. })));

        let bad_scheme = ClientConfig::new("ftp://host", "k", "m", Duration::from_secs(1));
        assert!(matches!(bad_scheme, Err(Error::Configuration { .. })));

        let empty_model = ClientConfig::new(DEFAULT_BASE_URL, "k", "  ", Duration::from_secs(1));
        assert!(matches!(empty_model, Err(Error::Configuration { .. })));

        let zero_timeout = ClientConfig::new(DEFAULT_BASE_URL, "k", "m", Duration::ZERO);
        assert!(matches!(zero_timeout, Err(Error::Configuration { .. })));
    }
}
