//! Fixed byte geometry of the settings image.
//!
//! These constants come from the firmware itself and must match it
//! bit-exactly; they delimit the payload, the checksum fields, and the
//! file-variant trailer.

/// Logical payload size of the settings image, all supported versions.
pub const IMAGE_SIZE: usize = 4096;

/// Byte offset of the packed little-endian version word.
pub const VERSION_OFFSET: usize = 0x008;

/// Byte offset of the legacy 16-bit weighted checksum.
pub const CRC_OFFSET: usize = 0x00E;

/// Byte offset of the CRC-32 word; the CRC-32 covers `0..CRC32_OFFSET`.
pub const CRC32_OFFSET: usize = 0xFFC;

/// Byte offset of the platform id byte (0 = ESP82xx, 1-4 = ESP32 family).
pub const PLATFORM_OFFSET: usize = 0xF36;

/// Highest platform id the firmware defines.
pub const PLATFORM_MAX: u8 = 4;

/// Trailing magic of the decrypted file variant, stored little-endian.
pub const FILE_MAGIC: u32 = 0x6357_6223;

/// Length of the decrypted-variant trailer.
pub const TRAILER_LEN: usize = 4;

/// Total length of the decrypted file variant (payload plus trailer).
pub const FILE_SIZE: usize = IMAGE_SIZE + TRAILER_LEN;
