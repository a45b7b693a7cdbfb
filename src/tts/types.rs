//! TTS (Text-to-Speech) types.

use serde::Serialize;
use std::path::PathBuf;

/// Audio formats the speech endpoint understands.
///
/// Smoke runs always request [`AudioFormat::Wav`]; the other variants exist
/// so the payload type models the endpoint faithfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Opus,
    Aac,
    Flac,
    Wav,
    Pcm,
}

impl AudioFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Opus => "audio/opus",
            Self::Aac => "audio/aac",
            Self::Flac => "audio/flac",
            Self::Wav => "audio/wav",
            Self::Pcm => "audio/pcm",
        }
    }
}

/// Fixed playback speed sent with every request.
pub const DEFAULT_SPEED: f32 = 1.0;

/// JSON body for `POST /v1/audio/speech`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeechRequest {
    pub model: String,
    pub input: String,
    /// Reference audio filename, resolved by the server.
    pub voice: String,
    pub response_format: AudioFormat,
    pub speed: f32,
}

impl SpeechRequest {
    pub fn new(
        model: impl Into<String>,
        input: impl Into<String>,
        voice: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            input: input.into(),
            voice: voice.into(),
            response_format: AudioFormat::Wav,
            speed: DEFAULT_SPEED,
        }
    }
}

/// One "speak and save" unit of work.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisJob {
    pub text: String,
    pub voice: String,
    pub output: PathBuf,
}

impl SynthesisJob {
    pub fn new(
        text: impl Into<String>,
        voice: impl Into<String>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            text: text.into(),
            voice: voice.into(),
            output: output.into(),
        }
    }
}

/// Audio that was written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedAudio {
    pub path: PathBuf,
    pub bytes: u64,
}

const VOICE_EXTENSIONS: [&str; 3] = [".wav", ".mp3", ".ogg"];

/// Normalize a reference voice name the way the server expects it.
///
/// Surrounding whitespace is dropped and `.wav` is appended unless the name
/// already carries an audio extension.
pub fn normalize_voice(voice: &str) -> String {
    let voice = voice.trim();
    if voice.is_empty() {
        return String::new();
    }
    let lower = voice.to_lowercase();
    if VOICE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        voice.to_string()
    } else {
        format!("{}.wav", voice)
    }
}
