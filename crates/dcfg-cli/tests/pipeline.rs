//! Integration tests for the backup/restore pipeline.

use anyhow::Result;

use dcfg_cli::pipeline::{
    PipelineError, RestoreOptions, RestoreOutcome, decode_image, read_file, restore_image,
    write_file,
};
use dcfg_codec::{EncodeOptions, FormatVariant, encode_blob};
use dcfg_model::{ConfigEntry, ConfigModel, ConfigValue, VersionTag, WarningMode};
use dcfg_schema::{SchemaRegistry, registry};

fn reg() -> &'static SchemaRegistry {
    registry().unwrap()
}

/// A valid wire-format image holding the schema defaults of `version`.
fn wire_image(version: VersionTag) -> Vec<u8> {
    let schema = reg().descriptors_for(version).unwrap();
    let mut model = ConfigModel::new(version);
    for descriptor in schema.iter() {
        model.insert(ConfigEntry {
            name: descriptor.name.to_string(),
            group: descriptor.group,
            sensitive: descriptor.sensitive,
            value: descriptor.default_value(),
        });
    }
    encode_blob(
        &model,
        None,
        reg(),
        EncodeOptions {
            variant: FormatVariant::Wire,
        },
    )
    .unwrap()
}

const VERSION: VersionTag = VersionTag::new(12, 0, 2, 0);

#[test]
fn empty_document_leaves_the_image_unchanged() {
    let baseline = wire_image(VERSION);
    let outcome =
        restore_image(&baseline, "{}", reg(), &RestoreOptions::default()).unwrap();
    assert!(matches!(outcome, RestoreOutcome::Unchanged));
}

#[test]
fn partial_document_touches_only_the_named_field() {
    let baseline = wire_image(VERSION);
    let outcome = restore_image(
        &baseline,
        r#"{"sleep": 25}"#,
        reg(),
        &RestoreOptions::default(),
    )
    .unwrap();
    let RestoreOutcome::Image(image) = outcome else {
        panic!("expected a new image");
    };
    assert_ne!(image, baseline);

    let decoded = decode_image(image, reg()).unwrap();
    assert_eq!(decoded.model.value("sleep"), Some(&ConfigValue::Integer(25)));

    let original = decode_image(baseline, reg()).unwrap();
    for entry in original.model.iter() {
        if entry.name != "sleep" {
            assert_eq!(decoded.model.value(&entry.name), Some(&entry.value));
        }
    }
}

#[test]
fn unknown_document_key_aborts_under_the_default_policy() {
    let baseline = wire_image(VERSION);
    let err = restore_image(
        &baseline,
        r#"{"no_such_field": 1}"#,
        reg(),
        &RestoreOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.exit_code(), 12);
}

#[test]
fn demoted_warnings_let_a_noop_restore_through() {
    let baseline = wire_image(VERSION);
    let options = RestoreOptions {
        warning_mode: WarningMode::Report,
        ..RestoreOptions::default()
    };
    let outcome = restore_image(&baseline, r#"{"no_such_field": 1}"#, reg(), &options).unwrap();
    assert!(matches!(outcome, RestoreOutcome::Unchanged));
}

#[test]
fn corrupted_image_fails_with_the_checksum_exit_code() {
    let mut baseline = wire_image(VERSION);
    baseline[0x200] ^= 0xFF;
    let err = restore_image(&baseline, "{}", reg(), &RestoreOptions::default()).unwrap_err();
    assert_eq!(err.exit_code(), 5);
}

#[test]
fn truncated_image_fails_with_the_size_exit_code() {
    let baseline = wire_image(VERSION);
    let err = restore_image(
        &baseline[..100],
        "{}",
        reg(),
        &RestoreOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.exit_code(), 4);
}

#[test]
fn restore_can_migrate_to_a_newer_firmware() {
    let baseline = wire_image(VersionTag::new(8, 5, 0, 0));
    let options = RestoreOptions {
        warning_mode: WarningMode::Report,
        target_version: Some(VERSION),
    };
    let outcome = restore_image(
        &baseline,
        r#"{"sleep": 10}"#,
        reg(),
        &options,
    )
    .unwrap();
    let RestoreOutcome::Image(image) = outcome else {
        panic!("expected a new image");
    };
    let decoded = decode_image(image, reg()).unwrap();
    assert_eq!(decoded.model.version(), VERSION);
    assert_eq!(decoded.model.value("sleep"), Some(&ConfigValue::Integer(10)));
    assert_eq!(
        decoded.model.value("device_name"),
        Some(&ConfigValue::text("Tasmota"))
    );
}

#[test]
fn file_helpers_distinguish_missing_files() -> Result<()> {
    let dir = tempfile::tempdir()?;

    let missing = dir.path().join("missing.dmp");
    let err = read_file(&missing).unwrap_err();
    assert_eq!(err.exit_code(), 3);
    assert!(matches!(err, PipelineError::FileNotFound { .. }));

    let path = dir.path().join("settings.dmp");
    let image = wire_image(VERSION);
    write_file(&path, &image)?;
    assert_eq!(read_file(&path)?, image);
    Ok(())
}
