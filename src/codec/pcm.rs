//! Interpretation of headerless signed 16-bit little-endian PCM.
//!
//! Raw PCM carries no header, so the sample rate and channel count always come
//! from the caller ([`PcmFormat`]). The interpreter de-interleaves the stream
//! into one normalized `f32` array per channel and returns an [`AudioBuffer`],
//! the shape both the WAV encoder and playback sinks consume.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::decode::RawAudioBytes;
use crate::{Error, ErrorContext, Result};

/// Sample rate the remote speech service renders at.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;
/// Channel count the remote speech service renders with.
pub const DEFAULT_CHANNEL_COUNT: u16 = 1;

/// Divisor mapping a signed 16-bit sample onto `[-1.0, 1.0)`.
const I16_SCALE: f32 = 32768.0;

/// Out-of-band description of a raw PCM stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PcmFormat {
    pub sample_rate: u32,
    pub channel_count: u16,
}

impl PcmFormat {
    pub fn new(sample_rate: u32, channel_count: u16) -> Self {
        Self {
            sample_rate,
            channel_count,
        }
    }

    pub fn mono(sample_rate: u32) -> Self {
        Self::new(sample_rate, 1)
    }

    pub fn stereo(sample_rate: u32) -> Self {
        Self::new(sample_rate, 2)
    }

    /// Bytes per complete frame (all channels) at 16 bits per sample.
    pub fn block_align(&self) -> u16 {
        self.channel_count.saturating_mul(2)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(Error::invalid_parameter_with_context(
                "sample rate must be positive",
                ErrorContext::new().with_field_path("sample_rate"),
            ));
        }
        if self.channel_count == 0 {
            return Err(Error::invalid_parameter_with_context(
                "channel count must be positive",
                ErrorContext::new().with_field_path("channel_count"),
            ));
        }
        Ok(())
    }
}

impl Default for PcmFormat {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE, DEFAULT_CHANNEL_COUNT)
    }
}

/// Multi-channel floating-point audio, immutable once built.
///
/// Every channel holds exactly `frame_count()` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    /// Builds a buffer from already de-interleaved channels.
    ///
    /// Fails when the sample rate is zero, no channel is given, the channel
    /// count does not fit a WAV header, or the channels differ in length.
    pub fn from_channels(sample_rate: u32, channels: Vec<Vec<f32>>) -> Result<Self> {
        let channel_count = u16::try_from(channels.len()).map_err(|_| {
            Error::invalid_parameter_with_context(
                "too many channels",
                ErrorContext::new()
                    .with_field_path("channels")
                    .with_details(format!("{} channels", channels.len())),
            )
        })?;
        PcmFormat::new(sample_rate, channel_count).validate()?;

        let frames = channels[0].len();
        if let Some((index, channel)) = channels
            .iter()
            .enumerate()
            .find(|(_, c)| c.len() != frames)
        {
            return Err(Error::invalid_parameter_with_context(
                "channels must have identical lengths",
                ErrorContext::new()
                    .with_field_path(format!("channels[{}]", index))
                    .with_details(format!("expected {} frames, got {}", frames, channel.len())),
            ));
        }

        Ok(Self {
            sample_rate,
            channels,
        })
    }

    /// Interprets raw interleaved 16-bit LE PCM bytes.
    pub fn from_pcm_bytes(bytes: &[u8], sample_rate: u32, channel_count: u16) -> Result<Self> {
        let format = PcmFormat::new(sample_rate, channel_count);
        format.validate()?;

        if bytes.len() % 2 != 0 {
            debug!(len = bytes.len(), "dropping trailing odd PCM byte");
        }
        let sample_count = bytes.len() / 2;
        let channel_count = channel_count as usize;
        let frame_count = sample_count / channel_count;
        if sample_count % channel_count != 0 {
            debug!(
                samples = sample_count,
                channel_count, "dropping trailing partial PCM frame"
            );
        }

        let channels: Vec<Vec<f32>> = (0..channel_count)
            .map(|c| {
                (0..frame_count)
                    .map(|i| {
                        let k = (i * channel_count + c) * 2;
                        i16::from_le_bytes([bytes[k], bytes[k + 1]]) as f32 / I16_SCALE
                    })
                    .collect()
            })
            .collect();

        Ok(Self {
            sample_rate,
            channels,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> u16 {
        // from_channels / from_pcm_bytes bound this by u16::MAX.
        self.channels.len() as u16
    }

    pub fn frame_count(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    pub fn format(&self) -> PcmFormat {
        PcmFormat::new(self.sample_rate, self.channel_count())
    }

    pub fn duration_secs(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }

    pub fn is_empty(&self) -> bool {
        self.frame_count() == 0
    }
}

/// Interprets decoded base64 bytes with an out-of-band format.
pub fn interpret_pcm(bytes: &RawAudioBytes, format: PcmFormat) -> Result<AudioBuffer> {
    AudioBuffer::from_pcm_bytes(bytes.as_bytes(), format.sample_rate, format.channel_count)
}
