//! Binary settings-image codec.
//!
//! Converts between the firmware's configuration image formats and the
//! typed [`dcfg_model::ConfigModel`]:
//!
//! - **blob**: format-variant detection (obfuscated wire image vs
//!   decrypted file with trailer)
//! - **crypto**: the involutive keystream transform
//! - **integrity**: size and checksum validation, checksum stamping
//! - **fields**: decode/encode of one typed value per field descriptor
//! - **reader** / **writer**: the full decode and encode pipelines
//!
//! The codec performs no I/O; callers hand in owned bytes and receive
//! owned bytes back. On decode the failure order is fixed: size first,
//! then checksum, then version support.

pub mod blob;
pub mod crypto;
pub mod fields;
pub mod integrity;
pub mod reader;
pub mod writer;

pub use blob::{FormatVariant, RawBlob};
pub use crypto::transform_in_place;
pub use fields::{decode_field, encode_field};
pub use integrity::{crc32, validate_payload};
pub use reader::{DecodeOptions, DecodedImage, decode_blob, decode_payload};
pub use writer::{EncodeOptions, encode_blob, encode_payload};
