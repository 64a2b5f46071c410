//! # voice-studio
//!
//! 文本转语音工作室运行时：远程 TTS 返回的 base64 PCM → 可播放的 AudioBuffer → 可下载的 WAV。
//!
//! Text-to-speech studio runtime. A script goes to a remote speech model, which
//! answers with base64-encoded, headerless 16-bit PCM. This crate turns that
//! payload into a playable [`AudioBuffer`] and a canonical WAV file.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use voice_studio::{KeyProvider, Player, Studio, StudioConfig};
//!
//! #[tokio::main]
//! async fn main() -> voice_studio::Result<()> {
//!     let config = StudioConfig::default().with_env_overrides();
//!     let client = voice_studio::tts::TtsClientBuilder::from_config(&config)
//!         .key_provider(KeyProvider::detect("gemini"))
//!         .build()?;
//!
//!     let studio = Studio::new(Arc::new(client), Player::default(), config);
//!     let generation = studio.generate(&studio.request("Hello there")).await?;
//!     let path = studio.save(&generation)?;
//!     println!("saved {}", path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`codec`] | base64 → PCM → [`AudioBuffer`] → WAV |
//! | [`tts`] | Remote speech model client |
//! | [`playback`] | Playback sink trait and single-source [`Player`] |
//! | [`download`] | `<prefix>-<timestamp>.wav` artifacts |
//! | [`credentials`] | API key lookup, keyring or environment |
//! | [`config`] | YAML + environment configuration |
//! | [`studio`] | Per-request pipeline glue |

pub mod codec;
pub mod config;
pub mod credentials;
pub mod download;
pub mod playback;
pub mod studio;
pub mod tts;

// Re-export main types for convenience
pub use codec::{AudioBuffer, PcmFormat, RawAudioBytes, WavBytes, WavHeader};
pub use config::StudioConfig;
pub use credentials::KeyProvider;
pub use playback::{PlaybackSink, PlaybackSource, Player};
pub use studio::{Generation, Studio};
pub use tts::{SpeechRequest, SpeechSynthesizer, TtsClient};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
