//! 音频编解码模块：base64 PCM → AudioBuffer → WAV。
//!
//! Raw-PCM ⇄ WAV codec.
//!
//! The remote speech service returns headerless 16-bit little-endian PCM as a
//! base64 string. This module turns that payload into a playable
//! [`AudioBuffer`] and serializes buffers into canonical WAV files.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`decode`] | Base64 decoding into [`RawAudioBytes`] |
//! | [`pcm`] | 16-bit PCM interpretation and de-interleaving |
//! | [`wav`] | Canonical 44-byte-header WAV encoding and header parsing |
//! | [`writer`] | Little-endian field helpers used by the encoder |
//!
//! ```rust
//! use voice_studio::codec::{self, PcmFormat};
//!
//! let buffer = codec::decode_pcm_base64("AAAAQA==", PcmFormat::default())?;
//! assert_eq!(buffer.channel(0).unwrap(), &[0.0, 0.5]);
//!
//! let wav = codec::encode_wav(&buffer);
//! assert_eq!(wav.len(), 48);
//! # Ok::<(), voice_studio::Error>(())
//! ```
//!
//! Every call builds fresh values and shares no state, so the functions can run
//! on any thread without coordination.

pub mod decode;
pub mod pcm;
pub mod wav;
pub mod writer;

pub use decode::{decode_base64, encode_base64, RawAudioBytes};
pub use pcm::{interpret_pcm, AudioBuffer, PcmFormat, DEFAULT_CHANNEL_COUNT, DEFAULT_SAMPLE_RATE};
pub use wav::{decode_wav, encode_wav, float_to_i16, interleave, WavBytes, WavHeader};

use crate::Result;

/// Decodes a base64 PCM payload straight into an [`AudioBuffer`].
pub fn decode_pcm_base64(payload: &str, format: PcmFormat) -> Result<AudioBuffer> {
    format.validate()?;
    let raw = decode_base64(payload)?;
    interpret_pcm(&raw, format)
}

/// Full pipeline: base64 PCM payload → WAV file.
///
/// Either the complete container is produced or an error is returned.
pub fn pcm_base64_to_wav(payload: &str, format: PcmFormat) -> Result<WavBytes> {
    let buffer = decode_pcm_base64(payload, format)?;
    Ok(encode_wav(&buffer))
}
