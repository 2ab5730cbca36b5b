//! Size and checksum validation.
//!
//! The image carries two checksums: the CRC-32 word at the end of the
//! payload, which validation checks, and the firmware's legacy 16-bit
//! weighted checksum, which encode still writes for compatibility with
//! older consumers. Size is always checked before any checksum work so a
//! truncated buffer can never reach checksum evaluation.

use dcfg_model::{ConfigError, Result};
use dcfg_schema::geometry::{CRC32_OFFSET, CRC_OFFSET, IMAGE_SIZE};

/// Reflected CRC-32 (polynomial 0xEDB88320), as the firmware computes it.
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc: u32 = 0;
    for &byte in data {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
        }
    }
    !crc
}

/// The firmware's legacy weighted checksum: `sum(byte[i] * (i + 1))`
/// truncated to 16 bits, skipping its own storage bytes and everything
/// from the CRC-32 word onward.
fn legacy_crc(payload: &[u8]) -> u16 {
    let mut sum: u32 = 0;
    for (i, &byte) in payload[..CRC32_OFFSET].iter().enumerate() {
        if i == CRC_OFFSET || i == CRC_OFFSET + 1 {
            continue;
        }
        sum = sum.wrapping_add(u32::from(byte).wrapping_mul(i as u32 + 1));
    }
    sum as u16
}

/// Validate a decrypted payload: size first, then the CRC-32.
pub fn validate_payload(payload: &[u8]) -> Result<()> {
    if payload.len() != IMAGE_SIZE {
        return Err(ConfigError::SizeMismatch {
            expected: IMAGE_SIZE,
            actual: payload.len(),
        });
    }
    let stored = u32::from_le_bytes(
        payload[CRC32_OFFSET..CRC32_OFFSET + 4]
            .try_into()
            .unwrap_or([0; 4]),
    );
    let computed = crc32(&payload[..CRC32_OFFSET]);
    if stored != computed {
        return Err(ConfigError::ChecksumMismatch { stored, computed });
    }
    Ok(())
}

/// Recompute and write both checksum fields into a finalized payload.
///
/// The legacy checksum excludes the CRC-32 word, so it is written first
/// and then covered by the CRC-32.
pub fn stamp_checksums(payload: &mut [u8]) -> Result<()> {
    if payload.len() != IMAGE_SIZE {
        return Err(ConfigError::SizeMismatch {
            expected: IMAGE_SIZE,
            actual: payload.len(),
        });
    }
    let legacy = legacy_crc(payload);
    payload[CRC_OFFSET..CRC_OFFSET + 2].copy_from_slice(&legacy.to_le_bytes());
    let crc = crc32(&payload[..CRC32_OFFSET]);
    payload[CRC32_OFFSET..CRC32_OFFSET + 4].copy_from_slice(&crc.to_le_bytes());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc32_known_vector() {
        // Standard check value for "123456789".
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn stamped_payload_validates() {
        let mut payload = vec![0u8; IMAGE_SIZE];
        payload[0x100] = 0xAB;
        stamp_checksums(&mut payload).unwrap();
        validate_payload(&payload).unwrap();
    }

    #[test]
    fn flipped_byte_fails_checksum() {
        let mut payload = vec![0u8; IMAGE_SIZE];
        stamp_checksums(&mut payload).unwrap();
        payload[0x200] ^= 0x01;
        let err = validate_payload(&payload).unwrap_err();
        assert!(matches!(err, ConfigError::ChecksumMismatch { .. }));
    }

    #[test]
    fn short_buffer_is_size_mismatch_not_checksum() {
        let payload = vec![0u8; IMAGE_SIZE - 1];
        let err = validate_payload(&payload).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::SizeMismatch {
                expected: IMAGE_SIZE,
                actual
            } if actual == IMAGE_SIZE - 1
        ));
    }

    #[test]
    fn legacy_crc_skips_its_own_bytes() {
        let mut a = vec![0u8; IMAGE_SIZE];
        let mut b = vec![0u8; IMAGE_SIZE];
        b[CRC_OFFSET] = 0xFF;
        b[CRC_OFFSET + 1] = 0xFF;
        assert_eq!(legacy_crc(&a), legacy_crc(&b));
        a[0] = 1;
        assert_ne!(legacy_crc(&a), legacy_crc(&b));
    }
}
