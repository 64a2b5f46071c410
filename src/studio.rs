//! One generation request end to end: stop prior playback, synthesize, decode,
//! encode.

use std::path::PathBuf;
use std::sync::Arc;

use crate::codec::{self, AudioBuffer, PcmFormat, WavBytes};
use crate::config::StudioConfig;
use crate::download;
use crate::playback::Player;
use crate::tts::{SpeechRequest, SpeechSynthesizer};
use crate::Result;

/// Output of one generation request. Owns its audio; nothing is shared with
/// other requests.
#[derive(Debug, Clone)]
pub struct Generation {
    pub audio: Arc<AudioBuffer>,
    pub wav: WavBytes,
}

impl Generation {
    /// Builds a generation from an already-received base64 PCM payload.
    pub fn from_base64(payload: &str, format: PcmFormat) -> Result<Self> {
        let audio = codec::decode_pcm_base64(payload, format)?;
        let wav = codec::encode_wav(&audio);
        Ok(Self {
            audio: Arc::new(audio),
            wav,
        })
    }
}

pub struct Studio {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    player: Player,
    config: StudioConfig,
}

impl Studio {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, player: Player, config: StudioConfig) -> Self {
        Self {
            synthesizer,
            player,
            config,
        }
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Request prefilled with the configured voice, language and emotion.
    pub fn request(&self, script: impl Into<String>) -> SpeechRequest {
        SpeechRequest {
            script: script.into(),
            voice: self.config.voice.clone(),
            language: self.config.language.clone(),
            emotion: self.config.emotion.clone(),
        }
    }

    /// Runs one generation. Any previous playback is stopped before the
    /// network call is made.
    pub async fn generate(&self, request: &SpeechRequest) -> Result<Generation> {
        self.player.stop();

        let audio = self.synthesizer.synthesize(request).await?;
        let format = self.config.format;
        if let Some(rate) = audio.declared_sample_rate() {
            if rate != format.sample_rate {
                tracing::warn!(
                    declared = rate,
                    configured = format.sample_rate,
                    "service declared a different sample rate; using configured format"
                );
            }
        }
        Generation::from_base64(&audio.data_base64, format)
    }

    /// Generates and immediately starts playback.
    pub async fn generate_and_play(&self, request: &SpeechRequest) -> Result<Generation> {
        let generation = self.generate(request).await?;
        self.player.play(generation.audio.clone())?;
        Ok(generation)
    }

    /// Writes a generation's WAV to the configured output directory.
    pub fn save(&self, generation: &Generation) -> Result<PathBuf> {
        download::save_wav(
            &self.config.output_dir,
            &self.config.output_prefix,
            &generation.wav,
        )
    }
}
