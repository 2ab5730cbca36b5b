//! The firmware's byte obfuscation.
//!
//! The wire image is obfuscated with a fixed position-dependent keystream:
//! byte `i` is XORed with `(0x5A + i) & 0xFF`. The transform is its own
//! inverse and must stay bit-exact with the firmware; any deviation
//! corrupts every field of an encoded image without necessarily tripping
//! the checksum, because the checksum covers the de-obfuscated payload.

/// Keystream base constant, as defined by the firmware.
const KEY_BASE: u32 = 0x5A;

/// Apply the involutive keystream over `payload` in place.
///
/// Covers the payload region only; callers must never pass a buffer that
/// still carries a file trailer.
pub fn transform_in_place(payload: &mut [u8]) {
    for (i, byte) in payload.iter_mut().enumerate() {
        *byte ^= (KEY_BASE.wrapping_add(i as u32) & 0xFF) as u8;
    }
}

/// Convenience copy-transforming variant of [`transform_in_place`].
pub fn transformed(payload: &[u8]) -> Vec<u8> {
    let mut out = payload.to_vec();
    transform_in_place(&mut out);
    out
}
