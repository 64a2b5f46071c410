//! Canonical 16-bit PCM RIFF/WAVE container.
//!
//! The encoder always emits the 44-byte header layout below, all integers
//! little-endian:
//!
//! | Offset | Field | Value |
//! |--------|-------|-------|
//! | 0  | `"RIFF"` | literal |
//! | 4  | chunk size | `36 + data_len` |
//! | 8  | `"WAVE"` | literal |
//! | 12 | `"fmt "` | literal |
//! | 16 | fmt size | 16 |
//! | 20 | audio format | 1 (PCM) |
//! | 22 | channels | channel count |
//! | 24 | sample rate | Hz |
//! | 28 | byte rate | `sample_rate * channels * 2` |
//! | 32 | block align | `channels * 2` |
//! | 34 | bits per sample | 16 |
//! | 36 | `"data"` | literal |
//! | 40 | data size | `data_len` |

use super::pcm::AudioBuffer;
use super::writer::{
    read_i16_le, read_tag, read_u16_le, read_u32_le, write_i16_le, write_tag, write_u16_le,
    write_u32_le,
};
use crate::{Error, ErrorContext, Result};

pub const WAV_HEADER_LEN: usize = 44;
pub const BITS_PER_SAMPLE: u16 = 16;
const BYTES_PER_SAMPLE: usize = 2;
const FMT_CHUNK_LEN: u32 = 16;
const FORMAT_PCM: u16 = 1;

/// A complete WAV file held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavBytes(Vec<u8>);

impl WavBytes {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length of the sample payload following the header.
    pub fn data_len(&self) -> usize {
        self.0.len().saturating_sub(WAV_HEADER_LEN)
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }

    pub fn mime_type(&self) -> &'static str {
        "audio/wav"
    }
}

impl AsRef<[u8]> for WavBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Converts a float sample to 16-bit PCM.
///
/// Negative values scale by 32768 and positive by 32767, so `-1.0` maps to
/// `i16::MIN` and `1.0` to `i16::MAX` without overflow. NaN maps to silence.
///
/// Scaling runs in `f64`: in `f32` the product for values just above 0.5 can
/// land on an exact `.5` and round one step high.
#[inline]
pub fn float_to_i16(sample: f32) -> i16 {
    if sample.is_nan() {
        return 0;
    }
    let s = f64::from(sample).clamp(-1.0, 1.0);
    if s < 0.0 {
        (s * 32768.0).round() as i16
    } else {
        (s * 32767.0).round() as i16
    }
}

/// Interleaves all channels frame by frame: `c0[0], c1[0], .., c0[1], c1[1], ..`.
pub fn interleave(buffer: &AudioBuffer) -> Vec<f32> {
    let channels = buffer.channels();
    let frames = buffer.frame_count();
    let mut out = Vec::with_capacity(frames * channels.len());
    for i in 0..frames {
        out.extend(channels.iter().map(|c| c[i]));
    }
    out
}

/// RIFF chunk size and data size fields for a payload of `data_len` bytes.
///
/// RIFF sizes are 32-bit, so payloads past 4 GiB saturate at `u32::MAX`.
fn header_sizes(data_len: usize) -> (u32, u32) {
    let data = u32::try_from(data_len).unwrap_or(u32::MAX);
    (data.saturating_add(36), data)
}

/// Serializes an [`AudioBuffer`] into a canonical 16-bit PCM WAV file.
///
/// The output is always `44 + data_len` bytes; a buffer with no frames yields a
/// header-only file with a zero data size. RIFF cannot describe payloads over
/// 4 GiB; their size fields saturate at `u32::MAX`.
pub fn encode_wav(buffer: &AudioBuffer) -> WavBytes {
    let interleaved = interleave(buffer);
    let channel_count = buffer.channel_count();
    let sample_rate = buffer.sample_rate();
    let data_len = interleaved.len() * BYTES_PER_SAMPLE;
    let (chunk_size, data_size) = header_sizes(data_len);

    let mut out = vec![0u8; WAV_HEADER_LEN + data_len];
    write_tag(&mut out, 0, b"RIFF");
    write_u32_le(&mut out, 4, chunk_size);
    write_tag(&mut out, 8, b"WAVE");
    write_tag(&mut out, 12, b"fmt ");
    write_u32_le(&mut out, 16, FMT_CHUNK_LEN);
    write_u16_le(&mut out, 20, FORMAT_PCM);
    write_u16_le(&mut out, 22, channel_count);
    write_u32_le(&mut out, 24, sample_rate);
    write_u32_le(
        &mut out,
        28,
        sample_rate.saturating_mul(channel_count as u32 * BYTES_PER_SAMPLE as u32),
    );
    write_u16_le(&mut out, 32, channel_count.saturating_mul(BYTES_PER_SAMPLE as u16));
    write_u16_le(&mut out, 34, BITS_PER_SAMPLE);
    write_tag(&mut out, 36, b"data");
    write_u32_le(&mut out, 40, data_size);

    for (i, sample) in interleaved.iter().enumerate() {
        write_i16_le(&mut out, WAV_HEADER_LEN + i * BYTES_PER_SAMPLE, float_to_i16(*sample));
    }

    WavBytes(out)
}

/// Fields of a canonical 44-byte WAV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub chunk_size: u32,
    pub audio_format: u16,
    pub channel_count: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub data_len: u32,
}

impl WavHeader {
    /// Parses the canonical header layout [`encode_wav`] writes.
    ///
    /// Only plain 16-bit PCM with the `fmt ` chunk immediately followed by the
    /// `data` chunk is accepted.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < WAV_HEADER_LEN {
            return Err(header_error(
                "header",
                format!("need {} bytes, got {}", WAV_HEADER_LEN, bytes.len()),
            ));
        }
        for (offset, tag) in [(0, b"RIFF"), (8, b"WAVE"), (12, b"fmt "), (36, b"data")] {
            let found = read_tag(bytes, offset);
            if &found != tag {
                return Err(header_error(
                    format!("header[{}]", offset),
                    format!(
                        "expected {:?}, found {:?}",
                        String::from_utf8_lossy(tag),
                        String::from_utf8_lossy(&found)
                    ),
                ));
            }
        }

        let header = Self {
            chunk_size: read_u32_le(bytes, 4),
            audio_format: read_u16_le(bytes, 20),
            channel_count: read_u16_le(bytes, 22),
            sample_rate: read_u32_le(bytes, 24),
            byte_rate: read_u32_le(bytes, 28),
            block_align: read_u16_le(bytes, 32),
            bits_per_sample: read_u16_le(bytes, 34),
            data_len: read_u32_le(bytes, 40),
        };

        if read_u32_le(bytes, 16) != FMT_CHUNK_LEN {
            return Err(header_error("fmt.size", "expected 16-byte fmt chunk"));
        }
        if header.audio_format != FORMAT_PCM {
            return Err(header_error(
                "fmt.audio_format",
                format!("expected PCM (1), found {}", header.audio_format),
            ));
        }
        if header.bits_per_sample != BITS_PER_SAMPLE {
            return Err(header_error(
                "fmt.bits_per_sample",
                format!("expected 16, found {}", header.bits_per_sample),
            ));
        }
        if header.channel_count == 0 {
            return Err(header_error("fmt.channels", "channel count is zero"));
        }
        Ok(header)
    }

    /// Number of complete frames the data chunk declares.
    pub fn frame_count(&self) -> usize {
        match self.block_align {
            0 => 0,
            align => self.data_len as usize / align as usize,
        }
    }
}

fn header_error(field: impl Into<String>, details: impl Into<String>) -> Error {
    Error::decode_with_context(
        "malformed WAV header",
        ErrorContext::new()
            .with_field_path(field)
            .with_details(details)
            .with_source("wav_decoder"),
    )
}

/// Reads a canonical WAV file back into an [`AudioBuffer`].
///
/// Samples are normalized by 32768, the same scale the PCM interpreter uses.
pub fn decode_wav(bytes: &[u8]) -> Result<AudioBuffer> {
    let header = WavHeader::parse(bytes)?;
    let payload = &bytes[WAV_HEADER_LEN..];
    if payload.len() < header.data_len as usize {
        return Err(header_error(
            "data.size",
            format!(
                "header declares {} bytes, payload has {}",
                header.data_len,
                payload.len()
            ),
        ));
    }

    let channel_count = header.channel_count as usize;
    let frames = header.data_len as usize / (channel_count * BYTES_PER_SAMPLE);
    let channels: Vec<Vec<f32>> = (0..channel_count)
        .map(|c| {
            (0..frames)
                .map(|i| {
                    let offset = (i * channel_count + c) * BYTES_PER_SAMPLE;
                    read_i16_le(payload, offset) as f32 / 32768.0
                })
                .collect()
        })
        .collect();
    AudioBuffer::from_channels(header.sample_rate, channels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mono(samples: Vec<f32>) -> AudioBuffer {
        AudioBuffer::from_channels(24_000, vec![samples]).unwrap()
    }

    #[test]
    fn test_float_to_i16_boundaries() {
        assert_eq!(float_to_i16(1.0), 32767);
        assert_eq!(float_to_i16(-1.0), -32768);
        assert_eq!(float_to_i16(0.0), 0);
        assert_eq!(float_to_i16(0.5), 16384);
        assert_eq!(float_to_i16(-0.5), -16384);
    }

    #[test]
    fn test_float_to_i16_just_above_half() {
        // 16385/32768 * 32767 = 16384.49997, which f32 would round to 16385.
        assert_eq!(float_to_i16(16385.0 / 32768.0), 16384);
        assert_eq!(float_to_i16(16386.0 / 32768.0), 16385);
        assert_eq!(float_to_i16(16387.0 / 32768.0), 16386);
    }

    #[test]
    fn test_float_to_i16_matches_f64_formula() {
        for k in 0..=32768u32 {
            let s = k as f32 / 32768.0;
            let expected = (f64::from(s) * 32767.0).round() as i16;
            assert_eq!(float_to_i16(s), expected, "sample {k}/32768");
        }
    }

    #[test]
    fn test_header_sizes_saturate() {
        assert_eq!(header_sizes(4), (40, 4));
        assert_eq!(header_sizes(u32::MAX as usize - 36), (u32::MAX, u32::MAX - 36));
        assert_eq!(header_sizes(u32::MAX as usize - 10), (u32::MAX, u32::MAX - 10));
    }

    #[test]
    fn test_float_to_i16_clamps() {
        assert_eq!(float_to_i16(3.5), 32767);
        assert_eq!(float_to_i16(-7.0), -32768);
        assert_eq!(float_to_i16(f32::INFINITY), 32767);
        assert_eq!(float_to_i16(f32::NAN), 0);
    }

    #[test]
    fn test_mono_header_layout() {
        let wav = encode_wav(&mono(vec![0.0, 0.5]));
        let bytes = wav.as_bytes();
        assert_eq!(bytes.len(), 48);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(read_u32_le(bytes, 4), 40);
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(&bytes[12..16], b"fmt ");
        assert_eq!(read_u32_le(bytes, 16), 16);
        assert_eq!(read_u16_le(bytes, 20), 1);
        assert_eq!(read_u16_le(bytes, 22), 1);
        assert_eq!(read_u32_le(bytes, 24), 24_000);
        assert_eq!(read_u32_le(bytes, 28), 48_000);
        assert_eq!(read_u16_le(bytes, 32), 2);
        assert_eq!(read_u16_le(bytes, 34), 16);
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(read_u32_le(bytes, 40), 4);
        assert_eq!(read_i16_le(bytes, 44), 0);
        assert_eq!(read_i16_le(bytes, 46), 16384);
    }

    #[test]
    fn test_stereo_interleaving() {
        let buffer =
            AudioBuffer::from_channels(44_100, vec![vec![0.25, -0.25], vec![0.5, -0.5]]).unwrap();
        assert_eq!(interleave(&buffer), vec![0.25, 0.5, -0.25, -0.5]);

        let wav = encode_wav(&buffer);
        let bytes = wav.as_bytes();
        assert_eq!(read_u16_le(bytes, 22), 2);
        assert_eq!(read_u32_le(bytes, 28), 44_100 * 4);
        assert_eq!(read_u16_le(bytes, 32), 4);
        assert_eq!(read_u32_le(bytes, 40), 8);
        let payload: Vec<i16> = (0..4).map(|i| read_i16_le(bytes, 44 + i * 2)).collect();
        assert_eq!(payload, vec![8192, 16384, -8192, -16384]);
    }

    #[test]
    fn test_multichannel_interleaving_keeps_every_channel() {
        let buffer = AudioBuffer::from_channels(
            16_000,
            vec![vec![0.1, 0.4], vec![0.2, 0.5], vec![0.3, 0.6]],
        )
        .unwrap();
        assert_eq!(interleave(&buffer), vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
        let wav = encode_wav(&buffer);
        assert_eq!(wav.data_len(), 12);
        assert_eq!(read_u16_le(wav.as_bytes(), 32), 6);
    }

    #[test]
    fn test_empty_buffer_yields_header_only() {
        let wav = encode_wav(&mono(vec![]));
        assert_eq!(wav.len(), WAV_HEADER_LEN);
        assert_eq!(read_u32_le(wav.as_bytes(), 4), 36);
        assert_eq!(read_u32_le(wav.as_bytes(), 40), 0);
    }

    #[test]
    fn test_parse_roundtrips_encoded_header() {
        let buffer = AudioBuffer::from_channels(22_050, vec![vec![0.0; 10], vec![0.0; 10]]).unwrap();
        let wav = encode_wav(&buffer);
        let header = WavHeader::parse(wav.as_bytes()).unwrap();
        assert_eq!(header.sample_rate, 22_050);
        assert_eq!(header.channel_count, 2);
        assert_eq!(header.data_len, 40);
        assert_eq!(header.chunk_size, 76);
        assert_eq!(header.frame_count(), 10);
    }

    #[test]
    fn test_parse_rejects_truncated_and_foreign_headers() {
        assert!(WavHeader::parse(&[0u8; 20]).is_err());

        let mut bytes = encode_wav(&mono(vec![0.1])).into_inner();
        bytes[8..12].copy_from_slice(b"AVI ");
        let err = WavHeader::parse(&bytes).unwrap_err();
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("header[8]")
        );

        let mut bytes = encode_wav(&mono(vec![0.1])).into_inner();
        write_u16_le(&mut bytes, 20, 3);
        assert!(WavHeader::parse(&bytes).is_err());
    }

    #[test]
    fn test_decode_wav_recovers_samples() {
        let buffer = AudioBuffer::from_pcm_bytes(&[0x00, 0x00, 0x00, 0x40, 0x00, 0xC0], 24_000, 1)
            .unwrap();
        let decoded = decode_wav(encode_wav(&buffer).as_bytes()).unwrap();
        assert_eq!(decoded.sample_rate(), 24_000);
        assert_eq!(decoded.channel(0).unwrap(), &[0.0, 0.5, -0.5]);
    }

    #[test]
    fn test_decode_wav_rejects_short_payload() {
        let mut bytes = encode_wav(&mono(vec![0.1, 0.2])).into_inner();
        bytes.truncate(46);
        assert!(matches!(decode_wav(&bytes), Err(Error::Decode { .. })));
    }
}
