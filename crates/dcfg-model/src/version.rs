//! Firmware version tags.
//!
//! The firmware stores its version as a packed 32-bit word inside the
//! settings image. Schema selection, migration, and support checks all
//! compare versions through this type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A firmware version parsed from the packed version word.
///
/// Ordering follows the packed code, so `9.1.0` < `9.1.0.1` < `10.0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VersionTag {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
    pub build: u8,
}

impl VersionTag {
    /// Create a version tag from its four components.
    pub const fn new(major: u8, minor: u8, patch: u8, build: u8) -> Self {
        Self {
            major,
            minor,
            patch,
            build,
        }
    }

    /// Decode a packed version word (`major<<24 | minor<<16 | patch<<8 | build`).
    pub const fn from_code(code: u32) -> Self {
        Self {
            major: (code >> 24) as u8,
            minor: (code >> 16) as u8,
            patch: (code >> 8) as u8,
            build: code as u8,
        }
    }

    /// The packed version word as stored in the image.
    pub const fn code(self) -> u32 {
        (self.major as u32) << 24
            | (self.minor as u32) << 16
            | (self.patch as u32) << 8
            | self.build as u32
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.build == 0 {
            write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
        } else {
            write!(
                f,
                "{}.{}.{}.{}",
                self.major, self.minor, self.patch, self.build
            )
        }
    }
}

/// Error returned when a version string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid version string: {input}")]
pub struct VersionParseError {
    pub input: String,
}

impl FromStr for VersionTag {
    type Err = VersionParseError;

    /// Parse `"M.m.p"` or `"M.m.p.b"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || VersionParseError {
            input: s.to_string(),
        };
        let parts: Vec<&str> = s.trim().split('.').collect();
        if parts.len() != 3 && parts.len() != 4 {
            return Err(err());
        }
        let mut nums = [0u8; 4];
        for (slot, part) in nums.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| err())?;
        }
        Ok(Self::new(nums[0], nums[1], nums[2], nums[3]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_roundtrip() {
        let v = VersionTag::new(9, 2, 0, 3);
        assert_eq!(v.code(), 0x0902_0003);
        assert_eq!(VersionTag::from_code(0x0902_0003), v);
    }

    #[test]
    fn display_omits_zero_build() {
        assert_eq!(VersionTag::new(8, 2, 0, 0).to_string(), "8.2.0");
        assert_eq!(VersionTag::new(9, 2, 0, 3).to_string(), "9.2.0.3");
    }

    #[test]
    fn parse_accepts_three_or_four_parts() {
        assert_eq!(
            "8.2.0".parse::<VersionTag>().unwrap(),
            VersionTag::new(8, 2, 0, 0)
        );
        assert_eq!(
            "12.1.1.3".parse::<VersionTag>().unwrap(),
            VersionTag::new(12, 1, 1, 3)
        );
        assert!("8.2".parse::<VersionTag>().is_err());
        assert!("a.b.c".parse::<VersionTag>().is_err());
    }

    #[test]
    fn ordering_follows_code() {
        let older = VersionTag::new(9, 1, 0, 0);
        let newer = VersionTag::new(9, 1, 0, 1);
        assert!(older < newer);
        assert!(newer < VersionTag::new(10, 0, 0, 0));
    }
}
