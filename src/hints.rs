//! Remediation hints keyed on error responses.
//!
//! Services report common setup mistakes with recognizable bodies. Each
//! [`RemediationHint`] pairs an optional status code and a body substring with
//! a suggestion for the operator.

/// One entry of the hint table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemediationHint {
    /// Status the hint applies to; `None` matches any status.
    pub status: Option<u16>,
    /// Case-sensitive substring searched for in the response body.
    pub pattern: &'static str,
    pub hint: &'static str,
}

impl RemediationHint {
    pub fn matches(&self, status: u16, body: &str) -> bool {
        self.status.map_or(true, |s| s == status) && body.contains(self.pattern)
    }
}

pub const DEFAULT_HINTS: &[RemediationHint] = &[
    RemediationHint {
        status: Some(500),
        pattern: "FileNotFound",
        hint: "Check that the reference voice file exists in the service's api/ckyp/ directory.",
    },
    RemediationHint {
        status: Some(401),
        pattern: "",
        hint: "The service rejected the API key; check --api-key / TTS_API_KEY.",
    },
    RemediationHint {
        status: Some(404),
        pattern: "",
        hint: "Endpoint not found; check that --base-url points at the service root, \
               not at an endpoint.",
    },
];

/// Hints from `table` that apply to a response, in table order.
pub fn hints_for(table: &[RemediationHint], status: u16, body: &str) -> Vec<&'static str> {
    table
        .iter()
        .filter(|h| h.matches(status, body))
        .map(|h| h.hint)
        .collect()
}

/// Suggestions printed when the service cannot be reached at all.
pub fn connectivity_hints(authority: &str) -> Vec<String> {
    vec![
        "Is the API service running?".to_string(),
        format!("Is {} blocked by a firewall?", authority),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_hint() {
        let hints = hints_for(
            DEFAULT_HINTS,
            500,
            r#"{"detail":"FileNotFoundError: api/ckyp/missing.wav"}"#,
        );
        assert_eq!(hints.len(), 1);
        assert!(hints[0].contains("api/ckyp/"));
    }

    #[test]
    fn test_pattern_requires_matching_status() {
        assert!(hints_for(DEFAULT_HINTS, 400, "FileNotFound").is_empty());
        assert!(hints_for(DEFAULT_HINTS, 500, "CUDA out of memory").is_empty());
    }

    #[test]
    fn test_status_only_entries() {
        let hints = hints_for(DEFAULT_HINTS, 401, "");
        assert_eq!(hints.len(), 1);
        assert!(hints[0].contains("API key"));
    }

    #[test]
    fn test_any_status_entry() {
        let table = [RemediationHint {
            status: None,
            pattern: "busy",
            hint: "retry later",
        }];
        assert_eq!(hints_for(&table, 503, "server busy"), vec!["retry later"]);
        assert_eq!(hints_for(&table, 200, "busy"), vec!["retry later"]);
    }

    #[test]
    fn test_connectivity_hints_name_the_port() {
        let hints = connectivity_hints("127.0.0.1:7880");
        assert_eq!(hints.len(), 2);
        assert!(hints[1].contains("127.0.0.1:7880"));
    }
}
