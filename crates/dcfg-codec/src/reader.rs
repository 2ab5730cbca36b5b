//! The decode pipeline: raw bytes to `ConfigModel`.

use tracing::debug;

use dcfg_model::{ConfigEntry, ConfigModel, ConfigError, Result, VersionTag};
use dcfg_schema::SchemaRegistry;
use dcfg_schema::geometry::{PLATFORM_MAX, PLATFORM_OFFSET, VERSION_OFFSET};

use crate::blob::{FormatVariant, RawBlob};
use crate::fields::decode_field;
use crate::integrity::validate_payload;

/// Options for the decode pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    /// Decode against this schema version instead of the declared one.
    ///
    /// The declared version word is still parsed and reported; only the
    /// schema selection is overridden.
    pub version_override: Option<VersionTag>,
}

/// Result of decoding a raw image.
#[derive(Debug)]
pub struct DecodedImage {
    /// The typed model, in schema order.
    pub model: ConfigModel,
    /// The validated, de-obfuscated payload the model was decoded from.
    /// Restores re-encode onto these bytes so unknown regions survive.
    pub payload: Vec<u8>,
    /// The format variant the input arrived in.
    pub variant: FormatVariant,
}

/// Decode raw bytes of either format variant into a model.
///
/// Failure order is fixed: size (variant detection), then checksum, then
/// platform id, then version support.
pub fn decode_blob(
    bytes: Vec<u8>,
    registry: &SchemaRegistry,
    options: DecodeOptions,
) -> Result<DecodedImage> {
    let blob = RawBlob::detect(bytes)?;
    let variant = blob.variant();
    let payload = blob.into_payload();
    let model = decode_payload(&payload, registry, options)?;
    Ok(DecodedImage {
        model,
        payload,
        variant,
    })
}

/// Decode a de-obfuscated payload into a model.
pub fn decode_payload(
    payload: &[u8],
    registry: &SchemaRegistry,
    options: DecodeOptions,
) -> Result<ConfigModel> {
    validate_payload(payload)?;

    let platform = payload[PLATFORM_OFFSET];
    if platform > PLATFORM_MAX {
        return Err(ConfigError::UnsupportedPlatform { code: platform });
    }

    let declared = read_version(payload);
    let version = options.version_override.unwrap_or(declared);
    let schema = registry.descriptors_for(version)?;
    debug!(%declared, %version, fields = schema.len(), "decoding settings image");

    let mut model = ConfigModel::new(version);
    for descriptor in schema.iter() {
        model.insert(ConfigEntry {
            name: descriptor.name.to_string(),
            group: descriptor.group,
            sensitive: descriptor.sensitive,
            value: decode_field(descriptor, payload),
        });
    }
    Ok(model)
}

/// Parse the packed version word out of a payload.
pub fn read_version(payload: &[u8]) -> VersionTag {
    let code = u32::from_le_bytes(
        payload[VERSION_OFFSET..VERSION_OFFSET + 4]
            .try_into()
            .unwrap_or([0; 4]),
    );
    VersionTag::from_code(code)
}
