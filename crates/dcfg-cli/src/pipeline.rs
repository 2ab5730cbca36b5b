//! The staged backup/restore pipeline and its stable exit-code contract.
//!
//! Every fatal condition maps to one documented process exit code, so
//! scripts driving `dcfg` can branch on the failure class without parsing
//! stderr.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use dcfg_codec::{DecodeOptions, DecodedImage, EncodeOptions, decode_blob, encode_blob};
use dcfg_migrate::{merge_overlay, migrate};
use dcfg_model::{ConfigError, ConfigModel, Group, VersionTag, WarningMode, check_warnings};
use dcfg_report::{DocumentError, parse_document};
use dcfg_schema::{SchemaError, SchemaRegistry, registry};

/// Success.
pub const EXIT_OK: i32 = 0;
/// Restore skipped because the encoded image equals the baseline.
pub const EXIT_UNCHANGED: i32 = 1;
/// Invalid command line arguments.
pub const EXIT_USAGE: i32 = 2;
/// Internal error (invalid built-in layout table).
pub const EXIT_INTERNAL: i32 = 20;

/// A fatal pipeline failure, each variant carrying its exit code class.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("invalid argument: {0}")]
    Argument(String),

    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl PipelineError {
    /// The stable process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Argument(_) => EXIT_USAGE,
            PipelineError::FileNotFound { .. } => 3,
            PipelineError::Read { .. } => 8,
            PipelineError::Write { .. } => 9,
            PipelineError::Config(error) => match error {
                ConfigError::SizeMismatch { .. } => 4,
                ConfigError::ChecksumMismatch { .. } => 5,
                ConfigError::UnsupportedPlatform { .. } => 6,
                ConfigError::UnsupportedVersion(_) => 7,
                ConfigError::KindMismatch { .. } => 10,
                ConfigError::LengthMismatch { .. }
                | ConfigError::ValueTooLong { .. }
                | ConfigError::EncodeFailure { .. } => 11,
                ConfigError::RestoreAborted { .. } => 12,
            },
            PipelineError::Document(_) => 10,
            PipelineError::Schema(_) => EXIT_INTERNAL,
        }
    }
}

/// The validated process-wide layout registry.
pub fn load_registry() -> Result<&'static SchemaRegistry, PipelineError> {
    Ok(registry()?)
}

/// Read a file, distinguishing missing files from other read failures.
pub fn read_file(path: &Path) -> Result<Vec<u8>, PipelineError> {
    fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => PipelineError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => PipelineError::Read {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// Write an output file.
pub fn write_file(path: &Path, bytes: &[u8]) -> Result<(), PipelineError> {
    fs::write(path, bytes).map_err(|source| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), bytes = bytes.len(), "wrote output");
    Ok(())
}

/// Decode a raw image of either format variant.
pub fn decode_image(
    bytes: Vec<u8>,
    registry: &SchemaRegistry,
) -> Result<DecodedImage, PipelineError> {
    Ok(decode_blob(bytes, registry, DecodeOptions::default())?)
}

/// Migrate a model to another firmware version under the warning policy.
pub fn migrate_model(
    model: &ConfigModel,
    target: VersionTag,
    registry: &SchemaRegistry,
    mode: WarningMode,
) -> Result<ConfigModel, PipelineError> {
    let (migrated, warnings) = migrate(model, target, registry)?;
    for warning in &warnings {
        warn!(%warning, "migration warning");
    }
    check_warnings(&warnings, mode)?;
    Ok(migrated)
}

/// Parse a comma-separated group selection into a filter set.
///
/// The empty string yields the empty set, which filters nothing.
pub fn parse_groups(selection: &str) -> Result<BTreeSet<Group>, PipelineError> {
    let mut groups = BTreeSet::new();
    for name in selection.split(',') {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let group = name.parse().map_err(PipelineError::Argument)?;
        groups.insert(group);
    }
    Ok(groups)
}

/// Parse a `--target-version` argument.
pub fn parse_version(text: &str) -> Result<VersionTag, PipelineError> {
    text.parse()
        .map_err(|error| PipelineError::Argument(format!("{error}")))
}

/// The result of assembling a restore image.
#[derive(Debug)]
pub enum RestoreOutcome {
    /// The encoded image is byte-identical to the baseline; nothing to write.
    Unchanged,
    /// The new raw image to write, in the baseline's format variant.
    Image(Vec<u8>),
}

/// Options controlling a restore run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RestoreOptions {
    /// Warning policy; `Fatal` aborts on any migration/merge warning.
    pub warning_mode: WarningMode,
    /// Migrate the merged model to this version before encoding.
    pub target_version: Option<VersionTag>,
}

/// Merge a settings document onto a baseline image and re-encode it.
///
/// The baseline is decoded and validated first, then the document overlay
/// is applied on top of it, so a partial document touches only the fields
/// it names. Encoding reuses the baseline payload, which preserves byte
/// regions outside the schema. The output format variant matches the
/// baseline's.
pub fn restore_image(
    baseline: &[u8],
    document: &str,
    registry: &SchemaRegistry,
    options: &RestoreOptions,
) -> Result<RestoreOutcome, PipelineError> {
    let decoded = decode_image(baseline.to_vec(), registry)?;
    let overlay = parse_document(document)?;
    debug!(keys = overlay.len(), "parsed restore document");

    let (merged, warnings) = merge_overlay(&decoded.model, &overlay)?;
    for warning in &warnings {
        warn!(%warning, "restore warning");
    }
    check_warnings(&warnings, options.warning_mode)?;

    let merged = match options.target_version {
        Some(target) if target != merged.version() => {
            migrate_model(&merged, target, registry, options.warning_mode)?
        }
        _ => merged,
    };

    let encoded = encode_blob(
        &merged,
        Some(&decoded.payload),
        registry,
        EncodeOptions {
            variant: decoded.variant,
        },
    )?;
    if encoded == baseline {
        info!("restore image identical to baseline, skipping write");
        return Ok(RestoreOutcome::Unchanged);
    }
    Ok(RestoreOutcome::Image(encoded))
}
