//! TTS（文字转语音）模块：将文本脚本发送到远程模型，取回 base64 编码的 PCM 音频。

mod client;
mod types;

pub use client::{SpeechSynthesizer, TtsClient, TtsClientBuilder};
pub use types::{SpeechRequest, SynthesizedAudio};
