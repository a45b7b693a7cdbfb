//! Test-case tables.
//!
//! A [`Suite`] is an ordered list of cases sharing one reference voice. Suites
//! come from the built-in presets or from YAML files:
//!
//! ```yaml
//! voice: kn-nayuki.wav
//! cases:
//!   - label: Japanese (native)
//!     lang: jp
//!     text: こんにちは、これは日本語モデルのテストです。
//!     output: jp_model_infer_japanese.wav
//! ```

use crate::config::{DEFAULT_OUTPUT, DEFAULT_TEXT, DEFAULT_VOICE};
use crate::tts::SynthesisJob;
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    pub text: String,
    pub output: PathBuf,
}

impl TestCase {
    pub fn new(
        label: impl Into<String>,
        text: impl Into<String>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            label: label.into(),
            lang: None,
            text: text.into(),
            output: output.into(),
        }
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suite {
    pub voice: String,
    pub cases: Vec<TestCase>,
}

impl Suite {
    /// Parse and validate a suite from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let suite: Suite = serde_yaml::from_str(yaml).map_err(|e| {
            Error::suite_with_context(
                "invalid suite definition",
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("suite_loader"),
            )
        })?;
        suite.validate()?;
        Ok(suite)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            Error::suite_with_context(
                format!("cannot read {}", path.display()),
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("suite_loader"),
            )
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Look up a built-in suite by name.
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::default_smoke()),
            "japanese" => Some(Self::japanese_cross_lingual()),
            _ => None,
        }
    }

    pub fn builtin_names() -> &'static [&'static str] {
        &["default", "japanese"]
    }

    /// Single Chinese sentence against the default voice.
    pub fn default_smoke() -> Self {
        Self {
            voice: DEFAULT_VOICE.to_string(),
            cases: vec![TestCase::new("Chinese", DEFAULT_TEXT, DEFAULT_OUTPUT).with_lang("zh")],
        }
    }

    /// Native and cross-lingual inference on a Japanese model instance.
    pub fn japanese_cross_lingual() -> Self {
        Self {
            voice: "kn-nayuki.wav".to_string(),
            cases: vec![
                TestCase::new(
                    "Japanese (native)",
                    "こんにちは、これは日本語モデルのテストです。雪が綺麗ですね。",
                    "jp_model_infer_japanese.wav",
                )
                .with_lang("jp"),
                TestCase::new(
                    "Chinese (cross-lingual)",
                    "你好，我是在用日语模型说中文，听听我的发音准不准？",
                    "jp_model_infer_chinese.wav",
                )
                .with_lang("zh"),
                TestCase::new(
                    "English (cross-lingual)",
                    "Hello, I am a Japanese model speaking English. Do I have a Japanese accent?",
                    "jp_model_infer_english.wav",
                )
                .with_lang("en"),
            ],
        }
    }

    /// Replace the shared voice (used for CLI overrides).
    pub fn with_voice(mut self, voice: impl Into<String>) -> Result<Self> {
        let voice = voice.into();
        if voice.trim().is_empty() {
            return Err(invalid("suite.voice", "reference voice must not be empty"));
        }
        self.voice = voice;
        Ok(self)
    }

    /// Resolve every relative output path against `dir`.
    pub fn with_output_dir(mut self, dir: &Path) -> Self {
        for case in &mut self.cases {
            if case.output.is_relative() {
                case.output = dir.join(&case.output);
            }
        }
        self
    }

    /// Synthesis jobs in case order.
    pub fn jobs(&self) -> impl Iterator<Item = (&TestCase, SynthesisJob)> + '_ {
        self.cases.iter().map(move |case| {
            let job = SynthesisJob::new(&case.text, &self.voice, &case.output);
            (case, job)
        })
    }

    fn validate(&self) -> Result<()> {
        if self.voice.trim().is_empty() {
            return Err(invalid("suite.voice", "reference voice must not be empty"));
        }
        if self.cases.is_empty() {
            return Err(invalid("suite.cases", "suite has no cases"));
        }
        let mut outputs = HashSet::new();
        for (i, case) in self.cases.iter().enumerate() {
            if case.text.trim().is_empty() {
                return Err(invalid(
                    format!("suite.cases[{}].text", i),
                    "text must not be empty",
                ));
            }
            if case.output.as_os_str().is_empty() {
                return Err(invalid(
                    format!("suite.cases[{}].output", i),
                    "output path must not be empty",
                ));
            }
            // Two cases writing one file would silently discard a result.
            if !outputs.insert(case.output.clone()) {
                return Err(invalid(
                    format!("suite.cases[{}].output", i),
                    format!("duplicate output path {}", case.output.display()),
                ));
            }
        }
        Ok(())
    }
}

fn invalid(field: impl Into<String>, msg: impl Into<String>) -> Error {
    Error::suite_with_context(
        msg,
        ErrorContext::new()
            .with_field_path(field)
            .with_source("suite_loader"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_suite_yaml() {
        let yaml = r#"
voice: kn-nayuki.wav
cases:
  - label: Japanese
    lang: jp
    text: こんにちは
    output: jp.wav
  - label: English
    text: Hello
    output: en.wav
"#;
        let suite = Suite::from_yaml_str(yaml).unwrap();
        assert_eq!(suite.voice, "kn-nayuki.wav");
        assert_eq!(suite.cases.len(), 2);
        assert_eq!(suite.cases[0].lang.as_deref(), Some("jp"));
        assert_eq!(suite.cases[1].lang, None);
        assert_eq!(suite.cases[1].output, PathBuf::from("en.wav"));
    }

    #[test]
    fn test_rejects_duplicate_outputs() {
        let yaml = r#"
voice: a.wav
cases:
  - { label: one, text: x, output: same.wav }
  - { label: two, text: y, output: same.wav }
"#;
        match Suite::from_yaml_str(yaml) {
            Err(Error::Suite { context, .. }) => {
                assert_eq!(context.field_path.as_deref(), Some("suite.cases[1].output"));
            }
            other => panic!("expected suite error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_empty_suite_and_bad_yaml() {
        assert!(Suite::from_yaml_str("voice: a.wav\ncases: []\n").is_err());
        assert!(Suite::from_yaml_str("voice: [unclosed").is_err());
        let no_voice = "cases:\n  - { label: a, text: b, output: c.wav }\n";
        assert!(Suite::from_yaml_str(no_voice).is_err());
    }

    #[test]
    fn test_builtin_suites_are_valid() {
        for name in Suite::builtin_names() {
            let suite = Suite::builtin(name).unwrap();
            suite.validate().unwrap();
        }
        assert!(Suite::builtin("klingon").is_none());

        let jp = Suite::japanese_cross_lingual();
        let langs: Vec<_> = jp.cases.iter().filter_map(|c| c.lang.as_deref()).collect();
        assert_eq!(langs, vec!["jp", "zh", "en"]);
    }

    #[test]
    fn test_output_dir_only_rewrites_relative_paths() {
        let mut suite = Suite::default_smoke();
        suite.cases.push(TestCase::new("abs", "x", "/tmp/abs.wav"));
        let suite = suite.with_output_dir(Path::new("out"));
        assert_eq!(suite.cases[0].output, PathBuf::from("out/test_result.wav"));
        assert_eq!(suite.cases[1].output, PathBuf::from("/tmp/abs.wav"));
    }

    #[test]
    fn test_voice_override_rejects_blank() {
        for blank in ["", "   ", "\t\n"] {
            match Suite::japanese_cross_lingual().with_voice(blank) {
                Err(Error::Suite { context, .. }) => {
                    assert_eq!(context.field_path.as_deref(), Some("suite.voice"));
                }
                other => panic!("blank voice {:?} accepted: {:?}", blank, other),
            }
        }
        let suite = Suite::default_smoke().with_voice("kn-nayuki").unwrap();
        assert_eq!(suite.voice, "kn-nayuki");
    }

    #[test]
    fn test_jobs_share_voice() {
        let suite = Suite::japanese_cross_lingual();
        let jobs: Vec<_> = suite.jobs().map(|(_, job)| job).collect();
        assert_eq!(jobs.len(), 3);
        assert!(jobs.iter().all(|j| j.voice == "kn-nayuki.wav"));
        assert_eq!(jobs[2].output, PathBuf::from("jp_model_infer_english.wav"));
    }
}
