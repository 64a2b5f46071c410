//! Base64 decoding of the remote service's audio payload.

use base64::Engine as _;

use crate::{Error, ErrorContext, Result};

/// Undecoded audio bytes with no structure yet: headerless PCM as delivered by
/// the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAudioBytes(Vec<u8>);

impl RawAudioBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for RawAudioBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for RawAudioBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Decodes a standard-alphabet, padded base64 string.
///
/// No URL-safe alphabet and no `data:` URI prefix are accepted.
pub fn decode_base64(input: &str) -> Result<RawAudioBytes> {
    base64::engine::general_purpose::STANDARD
        .decode(input)
        .map(RawAudioBytes)
        .map_err(|e| {
            Error::decode_with_context(
                format!("invalid base64 audio payload: {}", e),
                ErrorContext::new()
                    .with_source("base64_decoder")
                    .with_details(format!("input length {}", input.len())),
            )
        })
}

/// Encodes bytes with the same alphabet [`decode_base64`] accepts.
pub fn encode_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid_payload() {
        let raw = decode_base64("AAAAQA==").unwrap();
        assert_eq!(raw.as_bytes(), &[0x00, 0x00, 0x00, 0x40]);
        assert_eq!(raw.len(), 4);
    }

    #[test]
    fn test_decode_empty_payload() {
        let raw = decode_base64("").unwrap();
        assert!(raw.is_empty());
    }

    #[test]
    fn test_decode_rejects_foreign_characters() {
        let err = decode_base64("AAAA!A==").unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn test_decode_rejects_url_safe_alphabet() {
        // 0xFB 0xFF encodes to "-_8=" in the URL-safe alphabet and "+/8=" in standard.
        assert_eq!(decode_base64("+/8=").unwrap().as_bytes(), &[0xFB, 0xFF]);
        assert!(decode_base64("-_8=").is_err());
    }

    #[test]
    fn test_decode_rejects_bad_padding() {
        assert!(decode_base64("AAAAQ").is_err());
        assert!(decode_base64("AAAAQA=").is_err());
    }

    #[test]
    fn test_decode_rejects_data_uri_prefix() {
        assert!(decode_base64("data:audio/pcm;base64,AAAAQA==").is_err());
    }

    #[test]
    fn test_encode_matches_decode() {
        let bytes = vec![1u8, 2, 3, 250, 251];
        assert_eq!(decode_base64(&encode_base64(&bytes)).unwrap().into_inner(), bytes);
    }
}
