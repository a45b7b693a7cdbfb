use std::time::Duration;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error
    /// (e.g., "config.base_url", "suite.cases[1].output")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "speech_client", "suite_loader")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Unified error type for the smoke-test client.
///
/// Variants are grouped by how a run should react to them: connectivity
/// problems and timeouts point at the service process, `Status` carries the
/// service's own verdict, everything else is local.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Cannot connect to {url}: {message}")]
    Connect { url: String, message: String },

    #[error("Request to {url} timed out after {}", format_duration(.timeout))]
    Timeout { url: String, timeout: Duration },

    #[error("Service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Network transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Suite file error: {message}{}", format_context(.context))]
    Suite {
        message: String,
        context: ErrorContext,
    },
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

/// Render a timeout for humans: whole seconds when exact, milliseconds otherwise.
pub fn format_duration(d: &Duration) -> String {
    if d.subsec_millis() == 0 && d.as_secs() > 0 {
        format!("{}s", d.as_secs())
    } else {
        format!("{}ms", d.as_millis())
    }
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::configuration_with_context(msg, ErrorContext::new())
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Create a new suite error with structured context
    pub fn suite_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Suite {
            message: msg.into(),
            context,
        }
    }

    /// Classify a transport failure for `url`.
    ///
    /// reqwest folds refused connections, DNS failures and timeouts into one
    /// error type; the report needs them apart.
    pub(crate) fn from_transport(err: reqwest::Error, url: &str, timeout: Duration) -> Self {
        if err.is_timeout() {
            Error::Timeout {
                url: url.to_string(),
                timeout,
            }
        } else if err.is_connect() {
            Error::Connect {
                url: url.to_string(),
                message: root_cause(&err),
            }
        } else {
            Error::Transport(err)
        }
    }

    /// Classify a failure while streaming a response body for `url`.
    ///
    /// The blocking body reader surfaces the client timeout as an
    /// `io::Error` wrapping the reqwest error.
    pub(crate) fn from_body_io(err: std::io::Error, url: &str, timeout: Duration) -> Self {
        let timed_out = err.kind() == std::io::ErrorKind::TimedOut
            || err.get_ref().map_or(false, |inner| chain_timed_out(inner));
        if timed_out {
            Error::Timeout {
                url: url.to_string(),
                timeout,
            }
        } else {
            Error::Io(err)
        }
    }

    /// True when the service could not be reached at all.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Error::Connect { .. })
    }

    /// HTTP status returned by the service, if the failure came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::Suite { context, .. } => Some(context),
            _ => None,
        }
    }
}

fn chain_timed_out(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(req) = e.downcast_ref::<reqwest::Error>() {
            if req.is_timeout() {
                return true;
            }
        }
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::TimedOut {
                return true;
            }
            // io::Error::source skips the wrapped error itself.
            if let Some(inner) = io.get_ref() {
                let inner: &(dyn std::error::Error + 'static) = inner;
                current = Some(inner);
                continue;
            }
        }
        current = e.source();
    }
    false
}

fn root_cause(err: &(dyn std::error::Error + 'static)) -> String {
    let mut current = err;
    while let Some(next) = current.source() {
        current = next;
    }
    current.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_includes_context() {
        let err = Error::configuration_with_context(
            "base URL must be absolute",
            ErrorContext::new()
                .with_field_path("config.base_url")
                .with_source("config"),
        );
        let msg = err.to_string();
        assert!(msg.contains("base URL must be absolute"));
        assert!(msg.contains("field: config.base_url"));
        assert!(msg.contains("source: config"));
        assert!(err.context().is_some());
    }

    #[test]
    fn test_status_error_exposes_code() {
        let err = Error::Status {
            status: 500,
            body: "FileNotFound".into(),
        };
        assert_eq!(err.status(), Some(500));
        assert!(!err.is_connectivity());
        assert_eq!(err.to_string(), "Service returned HTTP 500: FileNotFound");
    }

    #[test]
    fn test_timeout_message_keeps_subsecond_precision() {
        let err = Error::Timeout {
            url: "http://127.0.0.1:7880/v1/audio/speech".into(),
            timeout: Duration::from_millis(300),
        };
        assert!(err.to_string().ends_with("timed out after 300ms"));
        assert_eq!(format_duration(&Duration::from_secs(120)), "120s");
        assert_eq!(format_duration(&Duration::from_millis(1500)), "1500ms");
    }

    #[test]
    fn test_body_io_timeout_is_classified_as_timeout() {
        let url = "http://127.0.0.1:7880/v1/audio/speech";
        let timed_out = std::io::Error::new(std::io::ErrorKind::TimedOut, "operation timed out");
        assert!(matches!(
            Error::from_body_io(timed_out, url, Duration::from_millis(500)),
            Error::Timeout { .. }
        ));

        let wrapped = std::io::Error::new(
            std::io::ErrorKind::Other,
            std::io::Error::new(std::io::ErrorKind::TimedOut, "operation timed out"),
        );
        assert!(matches!(
            Error::from_body_io(wrapped, url, Duration::from_millis(500)),
            Error::Timeout { .. }
        ));

        let disk_full = std::io::Error::new(std::io::ErrorKind::Other, "no space left on device");
        assert!(matches!(
            Error::from_body_io(disk_full, url, Duration::from_millis(500)),
            Error::Io(_)
        ));
    }

    #[test]
    fn test_connect_error_is_connectivity() {
        let err = Error::Connect {
            url: "http://127.0.0.1:7880/v1/models".into(),
            message: "Connection refused".into(),
        };
        assert!(err.is_connectivity());
        assert_eq!(err.status(), None);
        assert!(err.context().is_none());
    }
}
