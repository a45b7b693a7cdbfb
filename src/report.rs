//! Human-readable console report.
//!
//! Everything the operator reads goes through [`Reporter`], which writes to
//! any [`std::io::Write`] sink (stdout in the binary, a buffer in tests).
//! Diagnostics for developers go through `tracing` instead.

use crate::error::format_duration;
use crate::hints::{connectivity_hints, hints_for, RemediationHint, DEFAULT_HINTS};
use crate::preflight::ModelCheck;
use crate::tts::SavedAudio;
use crate::{Error, Result};
use std::io::Write;
use std::path::Path;

const SEPARATOR_WIDTH: usize = 50;

pub struct Reporter<W: Write> {
    out: W,
    hints: &'static [RemediationHint],
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            hints: DEFAULT_HINTS,
        }
    }

    pub fn with_hints(mut self, hints: &'static [RemediationHint]) -> Self {
        self.hints = hints;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn line(&mut self, text: impl AsRef<str>) -> Result<()> {
        writeln!(self.out, "{}", text.as_ref())?;
        Ok(())
    }

    pub fn separator(&mut self) -> Result<()> {
        self.line("-".repeat(SEPARATOR_WIDTH))
    }

    pub fn preflight_start(&mut self, url: &str) -> Result<()> {
        self.line(format!("[-] Checking service health: {}", url))
    }

    pub fn models_start(&mut self, url: &str) -> Result<()> {
        self.line(format!("[-] Listing models: {}", url))
    }

    /// Print every served model id, marking `target` with `*`.
    pub fn models(&mut self, listing: &Result<Vec<String>>, target: &str) -> Result<()> {
        let ids = match listing {
            Ok(ids) => ids,
            Err(e) if e.is_connectivity() => {
                return self.line(format!("[x] Service not started or unreachable: {}", e))
            }
            Err(e) => return self.line(format!("[!] Model check failed: {}", e)),
        };
        if ids.is_empty() {
            self.line("[!] The service listed no models.")?;
        }
        for id in ids {
            let marker = if id == target { "*" } else { " " };
            self.line(format!("  {} {}", marker, id))?;
        }
        if ids.iter().any(|id| id == target) {
            self.line(format!("[+] Service online; model '{}' is available.", target))
        } else {
            self.line(format!(
                "[!] Service online, but model '{}' is not listed.",
                target
            ))
        }
    }

    pub fn preflight(&mut self, check: &Result<ModelCheck>) -> Result<()> {
        let shown = match check {
            Ok(check) if check.is_available() => self.line(format!(
                "[+] Service online; model '{}' is available.",
                check.target
            )),
            Ok(check) => {
                self.line(format!(
                    "[!] Service online, but model '{}' is not listed.",
                    check.target
                ))?;
                let available: Vec<&str> = check.available.iter().map(String::as_str).collect();
                if available.is_empty() {
                    self.line("[!] The service listed no models.")
                } else {
                    self.line(format!("[!] Available models: {}", available.join(", ")))
                }
            }
            Err(e) if e.is_connectivity() => {
                self.line(format!("[x] Service not started or unreachable: {}", e))
            }
            Err(e) => self.line(format!("[!] Model check failed: {}", e)),
        };
        shown?;
        self.line("[-] Model check is advisory; continuing.")
    }

    pub fn attempt(&mut self, url: &str, voice: &str) -> Result<()> {
        self.line(format!("[-] Connecting to: {}", url))?;
        self.line(format!("[-] Reference voice: {}", voice))
    }

    pub fn case_start(&mut self, label: &str) -> Result<()> {
        self.line(format!("[-] Generating [{}] ...", label))
    }

    /// Report the outcome of one synthesis call. `authority` is the
    /// `host:port` named in connectivity hints.
    pub fn outcome(&mut self, result: &Result<SavedAudio>, authority: &str) -> Result<()> {
        match result {
            Ok(saved) => self.line(format!(
                "[+] Success! Audio saved to: {} ({} bytes)",
                display_path(&saved.path),
                saved.bytes
            )),
            Err(Error::Status { status, body }) => {
                self.line(format!("[!] Request failed, status code: {}", status))?;
                self.line(format!("[!] Error message: {}", body))?;
                for hint in hints_for(self.hints, *status, body) {
                    self.line(format!("[hint] {}", hint))?;
                }
                Ok(())
            }
            Err(Error::Connect { url, .. }) => {
                self.line(format!(
                    "[x] Cannot connect to the server at {}. Please check:",
                    url
                ))?;
                for (i, hint) in connectivity_hints(authority).iter().enumerate() {
                    self.line(format!("    {}. {}", i + 1, hint))?;
                }
                Ok(())
            }
            Err(Error::Timeout { url, timeout }) => self.line(format!(
                "[x] No response from {} within {}.",
                url,
                format_duration(timeout)
            )),
            Err(e) => self.line(format!("[x] Unexpected error: {}", e)),
        }
    }

    pub fn summary(&mut self, succeeded: usize, total: usize) -> Result<()> {
        self.line(format!("[=] Done: {}/{} cases succeeded.", succeeded, total))
    }
}

fn display_path(path: &Path) -> String {
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}
