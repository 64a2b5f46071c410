//! TTS (Text-to-Speech) types.

use serde::{Deserialize, Serialize};

/// One synthesis request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechRequest {
    pub script: String,
    pub voice: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,
}

impl SpeechRequest {
    pub fn new(script: impl Into<String>, voice: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            voice: voice.into(),
            language: None,
            emotion: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_emotion(mut self, emotion: impl Into<String>) -> Self {
        self.emotion = Some(emotion.into());
        self
    }

    /// Prompt text sent to the model, with language and emotion folded in as hints.
    pub fn prompt(&self) -> String {
        let mut hints = Vec::new();
        if let Some(emotion) = self.emotion.as_deref().filter(|e| !e.trim().is_empty()) {
            hints.push(format!("in a {} tone", emotion.trim()));
        }
        if let Some(language) = self.language.as_deref().filter(|l| !l.trim().is_empty()) {
            hints.push(format!("in {}", language.trim()));
        }
        if hints.is_empty() {
            self.script.clone()
        } else {
            format!("Say {}: {}", hints.join(" "), self.script)
        }
    }
}

/// Base64 PCM returned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedAudio {
    pub data_base64: String,
    pub mime_type: Option<String>,
}

impl SynthesizedAudio {
    /// Sample rate the service declared in its MIME type (`audio/L16;codec=pcm;rate=24000`), if any.
    pub fn declared_sample_rate(&self) -> Option<u32> {
        self.mime_type.as_deref()?.split(';').find_map(|param| {
            let (key, value) = param.trim().split_once('=')?;
            if key.eq_ignore_ascii_case("rate") {
                value.trim().parse().ok()
            } else {
                None
            }
        })
    }
}

// Wire format of the generateContent response; only the audio part is read.
#[derive(Debug, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Candidate {
    pub content: Option<Content>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Part {
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineData {
    pub mime_type: Option<String>,
    pub data: String,
}

impl GenerateContentResponse {
    pub(crate) fn into_audio(self) -> Option<SynthesizedAudio> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .find_map(|p| p.inline_data)
            .map(|d| SynthesizedAudio {
                data_base64: d.data,
                mime_type: d.mime_type,
            })
    }
}
