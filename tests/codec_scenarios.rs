//! End-to-end codec behavior: base64 payload → AudioBuffer → WAV.

use voice_studio::codec::{
    self, decode_base64, encode_base64, encode_wav, interpret_pcm, AudioBuffer, PcmFormat,
    WavHeader,
};
use voice_studio::Error;

fn u32_at(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

fn i16_at(bytes: &[u8], offset: usize) -> i16 {
    i16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

#[test]
fn test_base64_mono_payload_normalizes() {
    let payload = encode_base64(&[0x00, 0x00, 0x00, 0x40]);
    let buffer = codec::decode_pcm_base64(&payload, PcmFormat::mono(24_000)).unwrap();
    assert_eq!(buffer.sample_rate(), 24_000);
    assert_eq!(buffer.channel_count(), 1);
    assert_eq!(buffer.channel(0).unwrap(), &[0.0, 0.5]);
}

#[test]
fn test_mono_wav_layout() {
    let buffer = AudioBuffer::from_channels(24_000, vec![vec![0.0, 0.5]]).unwrap();
    let wav = encode_wav(&buffer);
    let bytes = wav.as_bytes();
    assert_eq!(bytes.len(), 48);
    assert_eq!(u32_at(bytes, 24), 24_000);
    assert_eq!(u32_at(bytes, 40), 4);
}

#[test]
fn test_odd_byte_is_dropped() {
    let raw = decode_base64(&encode_base64(&[0x01, 0x00, 0x02, 0x00, 0x03])).unwrap();
    assert_eq!(raw.len(), 5);
    let buffer = interpret_pcm(&raw, PcmFormat::default()).unwrap();
    assert_eq!(buffer.frame_count(), 2);
}

#[test]
fn test_stereo_payload_interleaves() {
    let left = vec![0.25, -1.0];
    let right = vec![1.0, -0.25];
    let buffer = AudioBuffer::from_channels(48_000, vec![left, right]).unwrap();
    let wav = encode_wav(&buffer);
    let bytes = wav.as_bytes();
    let payload: Vec<i16> = (0..4).map(|i| i16_at(bytes, 44 + i * 2)).collect();
    assert_eq!(payload, vec![8192, 32767, -32768, -8192]);
}

#[test]
fn test_malformed_base64_fails() {
    let err = codec::pcm_base64_to_wav("AAAA!AAA", PcmFormat::default()).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[test]
fn test_header_roundtrip_recovers_parameters() {
    for (rate, channels, frames) in [(24_000u32, 1u16, 0usize), (44_100, 2, 7), (8_000, 6, 3)] {
        let buffer =
            AudioBuffer::from_channels(rate, vec![vec![0.1; frames]; channels as usize]).unwrap();
        let wav = encode_wav(&buffer);
        let header = WavHeader::parse(wav.as_bytes()).unwrap();
        assert_eq!(header.sample_rate, rate);
        assert_eq!(header.channel_count, channels);
        assert_eq!(header.data_len as usize, frames * channels as usize * 2);
        assert_eq!(header.chunk_size, 36 + header.data_len);
        assert_eq!(wav.len(), 44 + header.data_len as usize);
    }
}

#[test]
fn test_encoding_is_idempotent() {
    let buffer =
        AudioBuffer::from_channels(24_000, vec![vec![0.3, -0.7, 0.99], vec![0.0, 0.1, -1.0]])
            .unwrap();
    assert_eq!(encode_wav(&buffer), encode_wav(&buffer));
}

#[test]
fn test_even_payload_partitions_across_channels() {
    let bytes: Vec<u8> = (0..24u8).collect();
    let raw = decode_base64(&encode_base64(&bytes)).unwrap();
    for channels in [1u16, 2, 3, 4, 6] {
        let buffer = interpret_pcm(&raw, PcmFormat::new(16_000, channels)).unwrap();
        assert_eq!(buffer.frame_count() * channels as usize, bytes.len() / 2);
        assert!(buffer.channels().iter().all(|c| c.len() == buffer.frame_count()));
    }
}

#[test]
fn test_pcm_survives_wav_roundtrip() {
    let samples: [i16; 6] = [0, 1, -1, 12_345, i16::MIN, i16::MAX];
    let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
    let wav = codec::pcm_base64_to_wav(&encode_base64(&bytes), PcmFormat::stereo(24_000)).unwrap();
    // Positives come back as round(k - k/32768): only i16::MAX moves, by one LSB.
    let payload: Vec<i16> = (0..6).map(|i| i16_at(wav.as_bytes(), 44 + i * 2)).collect();
    assert_eq!(payload, [0, 1, -1, 12_345, i16::MIN, 32_766]);
}

#[test]
fn test_positive_pcm_reencodes_exactly_below_max() {
    // Every positive sample except i16::MAX must come back unchanged.
    let bytes: Vec<u8> = (0..i16::MAX).flat_map(|s| s.to_le_bytes()).collect();
    let wav = codec::pcm_base64_to_wav(&encode_base64(&bytes), PcmFormat::mono(24_000)).unwrap();
    for k in 0..i16::MAX as usize {
        assert_eq!(i16_at(wav.as_bytes(), 44 + k * 2), k as i16, "sample {k}");
    }
}
