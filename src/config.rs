//! Studio configuration
//!
//! Loaded from a YAML file (or built from defaults) and then overlaid with
//! environment variables, following the same env-overridable defaults the HTTP
//! client uses.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::codec::PcmFormat;
use crate::{Error, ErrorContext, Result};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-tts";
pub const DEFAULT_VOICE: &str = "Kore";
pub const DEFAULT_OUTPUT_PREFIX: &str = "speech";

/// Configuration for a speech studio session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub base_url: String,
    pub model: String,
    pub voice: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,
    /// PCM layout of the service's output; not carried in the payload itself.
    pub format: PcmFormat,
    pub output_prefix: String,
    pub output_dir: PathBuf,
    pub timeout_secs: u64,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            voice: DEFAULT_VOICE.to_string(),
            language: None,
            emotion: None,
            format: PcmFormat::default(),
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            output_dir: PathBuf::from("."),
            timeout_secs: 60,
        }
    }
}

impl StudioConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration_with_context(
                format!("Failed to read config file: {}", e),
                ErrorContext::new().with_field_path(path.display().to_string()),
            )
        })?;
        Self::from_yaml_str(&text)
    }

    /// Applies `VOICE_STUDIO_*` environment overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("VOICE_STUDIO_BASE_URL") {
            self.base_url = url;
        }
        if let Some(model) = lookup("VOICE_STUDIO_MODEL") {
            self.model = model;
        }
        if let Some(voice) = lookup("VOICE_STUDIO_VOICE") {
            self.voice = voice;
        }
        if let Some(dir) = lookup("VOICE_STUDIO_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup("VOICE_STUDIO_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) => self.timeout_secs = secs,
                Err(_) => tracing::warn!(
                    value = %raw,
                    "ignoring non-numeric VOICE_STUDIO_TIMEOUT_SECS"
                ),
            }
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid base URL: {}", e),
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(self.base_url.clone()),
            )
        })?;
        if self.model.trim().is_empty() {
            return Err(Error::configuration_with_context(
                "Model must be specified",
                ErrorContext::new().with_field_path("model"),
            ));
        }
        if self.output_prefix.trim().is_empty() {
            return Err(Error::configuration_with_context(
                "Output prefix must not be empty",
                ErrorContext::new().with_field_path("output_prefix"),
            ));
        }
        self.format.validate()
    }
}
