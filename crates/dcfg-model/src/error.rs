//! The fatal error taxonomy shared across the pipeline.

use crate::value::ValueKind;
use crate::version::VersionTag;

/// Result type for operations that return [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Fatal operational errors.
///
/// Structural failures (`SizeMismatch`, `ChecksumMismatch`,
/// `UnsupportedVersion`, `UnsupportedPlatform`) abort the whole operation
/// before any output is produced. On decode the order is fixed: size is
/// checked first, then the checksum, then version support.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Buffer length does not match any expected image size class.
    #[error("size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Stored checksum does not match the checksum computed over the payload.
    #[error("checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { stored: u32, computed: u32 },

    /// The declared firmware version falls outside every supported range.
    #[error("unsupported firmware version: {0}")]
    UnsupportedVersion(VersionTag),

    /// The platform id byte identifies no known hardware family.
    #[error("unsupported platform id: {code:#04x}")]
    UnsupportedPlatform { code: u8 },

    /// A value of the wrong kind was supplied for a field.
    #[error("kind mismatch for {field}: expected {expected}, got {actual}")]
    KindMismatch {
        field: String,
        expected: ValueKind,
        actual: ValueKind,
    },

    /// A sequence value has the wrong number of elements for its field.
    #[error("length mismatch for {field}: expected {expected} elements, got {actual}")]
    LengthMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    /// A text value exceeds the fixed width of its field.
    #[error("value too long for {field}: at most {max} bytes, got {actual}")]
    ValueTooLong {
        field: String,
        max: usize,
        actual: usize,
    },

    /// A value could not be encoded into the image.
    #[error("failed to encode {field}: {message}")]
    EncodeFailure { field: String, message: String },

    /// Warnings accumulated during decode/merge and warnings are fatal.
    #[error("restore aborted: {count} warning(s); rerun with warnings demoted to proceed")]
    RestoreAborted { count: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_field() {
        let err = ConfigError::ValueTooLong {
            field: "hostname".to_string(),
            max: 32,
            actual: 40,
        };
        assert_eq!(
            err.to_string(),
            "value too long for hostname: at most 32 bytes, got 40"
        );
    }

    #[test]
    fn checksum_message_is_hex() {
        let err = ConfigError::ChecksumMismatch {
            stored: 0xDEAD_BEEF,
            computed: 0x1234_5678,
        };
        assert!(err.to_string().contains("0xdeadbeef"));
    }
}
