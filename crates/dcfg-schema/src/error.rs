//! Build-time registry validation errors.
//!
//! These are programming errors in the static layout table, surfaced once
//! when the registry is first built — before any blob is touched.

/// A violation of the layout table's build-time invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("field {field} exceeds image bounds: offset {offset:#x} + {span} bytes")]
    OutOfBounds {
        field: &'static str,
        offset: usize,
        span: usize,
    },

    #[error("field {field} has an invalid bit run: bit {bit} count {count}")]
    InvalidBitRun {
        field: &'static str,
        bit: u8,
        count: u8,
    },

    #[error("field {field} has an invalid width: {width}")]
    InvalidWidth { field: &'static str, width: usize },

    #[error("field {field}: arrays of this kind are not representable")]
    InvalidArrayKind { field: &'static str },

    #[error("field {field} has overlapping version ranges")]
    OverlappingRanges { field: &'static str },

    #[error("field {field} has a gap between its version ranges")]
    RangeGap { field: &'static str },

    #[error("field {field} range lies outside the supported version span")]
    RangeOutOfSpan { field: &'static str },

    #[error("field {field} default does not match its decoded kind")]
    DefaultKindMismatch { field: &'static str },

    #[error("duplicate command mapping {command}{index} in overlapping version ranges")]
    DuplicateCommand { command: &'static str, index: String },
}
