//! The encode pipeline: `ConfigModel` back to raw bytes.

use tracing::debug;

use dcfg_model::{ConfigError, ConfigModel, Result};
use dcfg_schema::SchemaRegistry;
use dcfg_schema::geometry::{IMAGE_SIZE, VERSION_OFFSET};

use crate::blob::{FormatVariant, RawBlob};
use crate::fields::encode_field;
use crate::integrity::stamp_checksums;

/// Options for the encode pipeline.
#[derive(Debug, Clone, Copy)]
pub struct EncodeOptions {
    /// The format variant to emit.
    pub variant: FormatVariant,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            variant: FormatVariant::Wire,
        }
    }
}

/// Encode a model into a finalized payload.
///
/// `baseline` should be the decoded payload of the image being restored
/// onto, so byte regions outside the schema survive the round trip; pass
/// `None` to encode onto a zeroed template. The model must cover exactly
/// the schema of its version — the migrator guarantees this.
pub fn encode_payload(
    model: &ConfigModel,
    baseline: Option<&[u8]>,
    registry: &SchemaRegistry,
) -> Result<Vec<u8>> {
    let mut payload = match baseline {
        Some(bytes) => {
            if bytes.len() != IMAGE_SIZE {
                return Err(ConfigError::SizeMismatch {
                    expected: IMAGE_SIZE,
                    actual: bytes.len(),
                });
            }
            bytes.to_vec()
        }
        None => vec![0u8; IMAGE_SIZE],
    };

    let version = model.version();
    let schema = registry.descriptors_for(version)?;
    debug!(%version, fields = schema.len(), "encoding settings image");

    payload[VERSION_OFFSET..VERSION_OFFSET + 4].copy_from_slice(&version.code().to_le_bytes());

    for descriptor in schema.iter() {
        let value = model.value(descriptor.name).ok_or_else(|| {
            ConfigError::EncodeFailure {
                field: descriptor.name.to_string(),
                message: "missing from model".to_string(),
            }
        })?;
        encode_field(descriptor, value, &mut payload)?;
    }

    stamp_checksums(&mut payload)?;
    Ok(payload)
}

/// Encode a model into raw bytes of the requested format variant.
pub fn encode_blob(
    model: &ConfigModel,
    baseline: Option<&[u8]>,
    registry: &SchemaRegistry,
    options: EncodeOptions,
) -> Result<Vec<u8>> {
    let payload = encode_payload(model, baseline, registry)?;
    let blob = RawBlob::from_payload(payload, options.variant)?;
    Ok(blob.bytes().to_vec())
}
