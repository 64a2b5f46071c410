//! TTS (Text-to-Speech) client.

use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::info;

use super::types::{GenerateContentResponse, SpeechRequest, SynthesizedAudio};
use crate::config::{StudioConfig, DEFAULT_BASE_URL};
use crate::credentials::KeyProvider;
use crate::{Error, ErrorContext, Result};

/// Anything that turns a script into base64 PCM.
///
/// The network call is the only suspension point in a generation request.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<SynthesizedAudio>;
}

/// Client for the remote text-to-speech model.
pub struct TtsClient {
    http_client: reqwest::Client,
    model: String,
    base_url: String,
    api_key: String,
}

impl TtsClient {
    pub fn builder() -> TtsClientBuilder {
        TtsClientBuilder::new()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    fn request_body(request: &SpeechRequest) -> serde_json::Value {
        serde_json::json!({
            "contents": [{ "parts": [{ "text": request.prompt() }] }],
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": { "voiceName": request.voice }
                    }
                }
            }
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl SpeechSynthesizer for TtsClient {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<SynthesizedAudio> {
        if request.script.trim().is_empty() {
            return Err(Error::invalid_parameter_with_context(
                "script must not be empty",
                ErrorContext::new().with_field_path("script"),
            ));
        }

        let started = Instant::now();
        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&Self::request_body(request))
            .send()
            .await
            .map_err(|e| {
                Error::network_with_context(
                    format!("TTS request failed: {}", e),
                    ErrorContext::new().with_source("tts"),
                )
            })?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            Error::network_with_context(
                format!("Failed to read TTS response: {}", e),
                ErrorContext::new().with_source("tts"),
            )
        })?;
        if !status.is_success() {
            let body_str = String::from_utf8_lossy(&bytes);
            return Err(Error::api_with_context(
                format!("TTS API error ({}): {}", status, body_str),
                ErrorContext::new().with_source("tts"),
            ));
        }

        let parsed: GenerateContentResponse = serde_json::from_slice(&bytes)?;
        let audio = parsed.into_audio().ok_or_else(|| {
            Error::api_with_context(
                "TTS response carried no audio",
                ErrorContext::new()
                    .with_field_path("candidates[0].content.parts[].inlineData")
                    .with_source("tts"),
            )
        })?;

        info!(
            model = %self.model,
            voice = %request.voice,
            payload_len = audio.data_base64.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "speech synthesized"
        );
        Ok(audio)
    }
}

pub struct TtsClientBuilder {
    model: Option<String>,
    api_key: Option<String>,
    key_provider: Option<KeyProvider>,
    base_url: Option<String>,
    timeout_secs: u64,
}

impl TtsClientBuilder {
    pub fn new() -> Self {
        Self {
            model: None,
            api_key: None,
            key_provider: None,
            base_url: None,
            timeout_secs: 60,
        }
    }

    /// Seeds model, base URL and timeout from a studio config.
    pub fn from_config(config: &StudioConfig) -> Self {
        Self::new()
            .model(config.model.clone())
            .base_url(config.base_url.clone())
            .timeout_secs(config.timeout_secs)
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
    /// Where to look up the key when none is set explicitly.
    pub fn key_provider(mut self, provider: KeyProvider) -> Self {
        self.key_provider = Some(provider);
        self
    }
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn build(self) -> Result<TtsClient> {
        let model = self
            .model
            .ok_or_else(|| Error::configuration("Model must be specified"))?;
        let api_key = self
            .api_key
            .or_else(|| self.key_provider.as_ref().and_then(KeyProvider::api_key))
            .ok_or_else(|| {
                let hint = self
                    .key_provider
                    .as_ref()
                    .map(|p| format!("set {}", p.env_var_name()))
                    .unwrap_or_else(|| "pass api_key()".to_string());
                Error::configuration_with_context(
                    "API key required",
                    ErrorContext::new().with_details(hint),
                )
            })?;
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))?;
        Ok(TtsClient {
            http_client,
            model,
            base_url,
            api_key,
        })
    }
}

impl Default for TtsClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
