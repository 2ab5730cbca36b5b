//! Raw image buffers and format-variant detection.

use dcfg_model::{ConfigError, Result};
use dcfg_schema::geometry::{FILE_MAGIC, FILE_SIZE, IMAGE_SIZE, TRAILER_LEN};

use crate::crypto;

/// The two byte-level formats a settings image travels in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatVariant {
    /// Obfuscated payload exactly as the firmware produces and accepts it.
    Wire,
    /// De-obfuscated payload with a 4-byte trailing magic; not valid for
    /// direct upload to the firmware.
    Decrypted,
}

impl FormatVariant {
    /// The exact byte length of this variant.
    pub fn expected_len(self) -> usize {
        match self {
            FormatVariant::Wire => IMAGE_SIZE,
            FormatVariant::Decrypted => FILE_SIZE,
        }
    }
}

/// An owned settings image in a known format variant.
///
/// Transient by design: created per operation from a transport read or
/// from encoding a model, and discarded after decode or write.
#[derive(Debug, Clone)]
pub struct RawBlob {
    variant: FormatVariant,
    bytes: Vec<u8>,
}

impl RawBlob {
    /// Classify raw bytes by length and trailer and take ownership.
    ///
    /// Anything that fits neither size class — including a file-sized
    /// buffer without the trailer magic — is a `SizeMismatch` against the
    /// wire size, reported before any checksum is evaluated.
    pub fn detect(bytes: Vec<u8>) -> Result<Self> {
        let variant = match bytes.len() {
            IMAGE_SIZE => FormatVariant::Wire,
            FILE_SIZE if has_trailer_magic(&bytes) => FormatVariant::Decrypted,
            _ => {
                return Err(ConfigError::SizeMismatch {
                    expected: IMAGE_SIZE,
                    actual: bytes.len(),
                });
            }
        };
        Ok(Self { variant, bytes })
    }

    /// Wrap bytes already known to be a given variant, checking length only.
    pub fn with_variant(bytes: Vec<u8>, variant: FormatVariant) -> Result<Self> {
        if bytes.len() != variant.expected_len() {
            return Err(ConfigError::SizeMismatch {
                expected: variant.expected_len(),
                actual: bytes.len(),
            });
        }
        Ok(Self { variant, bytes })
    }

    /// The detected format variant.
    pub fn variant(&self) -> FormatVariant {
        self.variant
    }

    /// The raw bytes, trailer included for the decrypted variant.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the blob, yielding the de-obfuscated logical payload.
    pub fn into_payload(self) -> Vec<u8> {
        let mut bytes = self.bytes;
        match self.variant {
            FormatVariant::Wire => {
                crypto::transform_in_place(&mut bytes);
                bytes
            }
            FormatVariant::Decrypted => {
                bytes.truncate(IMAGE_SIZE);
                bytes
            }
        }
    }

    /// Build a blob of the requested variant from a finalized payload.
    pub fn from_payload(payload: Vec<u8>, variant: FormatVariant) -> Result<Self> {
        if payload.len() != IMAGE_SIZE {
            return Err(ConfigError::SizeMismatch {
                expected: IMAGE_SIZE,
                actual: payload.len(),
            });
        }
        let mut bytes = payload;
        match variant {
            FormatVariant::Wire => crypto::transform_in_place(&mut bytes),
            FormatVariant::Decrypted => bytes.extend_from_slice(&FILE_MAGIC.to_le_bytes()),
        }
        Ok(Self { variant, bytes })
    }
}

fn has_trailer_magic(bytes: &[u8]) -> bool {
    bytes.len() >= TRAILER_LEN
        && bytes[bytes.len() - TRAILER_LEN..] == FILE_MAGIC.to_le_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_wire_by_length() {
        let blob = RawBlob::detect(vec![0u8; IMAGE_SIZE]).unwrap();
        assert_eq!(blob.variant(), FormatVariant::Wire);
    }

    #[test]
    fn detects_decrypted_by_trailer() {
        let mut bytes = vec![0u8; IMAGE_SIZE];
        bytes.extend_from_slice(&FILE_MAGIC.to_le_bytes());
        let blob = RawBlob::detect(bytes).unwrap();
        assert_eq!(blob.variant(), FormatVariant::Decrypted);
        assert_eq!(blob.into_payload().len(), IMAGE_SIZE);
    }

    #[test]
    fn file_size_without_magic_is_size_mismatch() {
        let bytes = vec![0u8; FILE_SIZE];
        let err = RawBlob::detect(bytes).unwrap_err();
        assert!(matches!(err, ConfigError::SizeMismatch { .. }));
    }

    #[test]
    fn truncated_wire_is_size_mismatch() {
        let err = RawBlob::detect(vec![0u8; IMAGE_SIZE - 1]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::SizeMismatch { expected, actual }
                if expected == IMAGE_SIZE && actual == IMAGE_SIZE - 1
        ));
    }

    #[test]
    fn payload_roundtrip_through_wire() {
        let mut payload = vec![0u8; IMAGE_SIZE];
        payload[7] = 0x99;
        let blob = RawBlob::from_payload(payload.clone(), FormatVariant::Wire).unwrap();
        assert_ne!(blob.bytes()[7], 0x99);
        assert_eq!(blob.into_payload(), payload);
    }
}
