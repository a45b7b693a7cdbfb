//! TTS（文字转语音）模块：向本地语音合成服务提交文本并将返回的音频保存到磁盘。

mod client;
mod types;

pub use client::{SpeechClient, SpeechClientBuilder};
pub use types::{
    normalize_voice, AudioFormat, SavedAudio, SpeechRequest, SynthesisJob, DEFAULT_SPEED,
};
