//! Subcommand entry points.

use std::path::Path;

use chrono::Utc;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{CellAlignment, ContentArrangement, Table};
use tracing::info;

use dcfg_cli::pipeline::{
    EXIT_OK, EXIT_UNCHANGED, PipelineError, RestoreOptions, RestoreOutcome, decode_image,
    load_registry, migrate_model, parse_groups, parse_version, read_file, restore_image,
    write_file,
};
use dcfg_codec::{EncodeOptions, encode_blob};
use dcfg_migrate::filter_groups;
use dcfg_model::{ConfigModel, WarningMode};
use dcfg_report::{
    CommandOptions, DocumentHeader, DocumentOptions, render_commands, render_document,
};
use dcfg_schema::SchemaRegistry;

use crate::cli::{BackupArgs, BackupFormatArg, RestoreArgs, ShowArgs, ShowFormatArg};

pub fn run_backup(args: &BackupArgs) -> Result<i32, PipelineError> {
    let registry = load_registry()?;
    let raw = read_file(&args.image)?;
    let decoded = decode_image(raw, registry)?;
    let mode = warning_mode(args.ignore_warnings);
    let model = apply_target_version(decoded.model, args.target_version.as_deref(), registry, mode)?;

    match args.format {
        BackupFormatArg::Json => {
            let model = apply_group_filter(&model, args.groups.as_deref())?;
            let text = render_document(&model, &document_options(args.indent, args.hide_pw))?;
            emit_text(&text, args.output.as_deref(), args.dry_run)
        }
        BackupFormatArg::Commands => {
            let model = apply_group_filter(&model, args.groups.as_deref())?;
            let schema = registry.descriptors_for(model.version())?;
            let options = command_options(args.aggregate, args.no_group_headers, args.hide_pw);
            let text = render_commands(&model, &schema, &options);
            emit_text(&text, args.output.as_deref(), args.dry_run)
        }
        BackupFormatArg::Binary => {
            if args.groups.is_some() {
                return Err(PipelineError::Argument(
                    "--groups does not apply to binary output".to_string(),
                ));
            }
            let Some(output) = args.output.as_deref() else {
                return Err(PipelineError::Argument(
                    "binary output requires --output".to_string(),
                ));
            };
            let bytes = encode_blob(
                &model,
                Some(&decoded.payload),
                registry,
                EncodeOptions {
                    variant: decoded.variant,
                },
            )?;
            if args.dry_run {
                info!(path = %output.display(), "dry run, skipping write");
            } else {
                write_file(output, &bytes)?;
            }
            Ok(EXIT_OK)
        }
    }
}

pub fn run_restore(args: &RestoreArgs) -> Result<i32, PipelineError> {
    let registry = load_registry()?;
    let baseline = read_file(&args.image)?;
    let document_bytes = read_file(&args.document)?;
    let document = String::from_utf8_lossy(&document_bytes);
    let options = RestoreOptions {
        warning_mode: warning_mode(args.ignore_warnings),
        target_version: args
            .target_version
            .as_deref()
            .map(parse_version)
            .transpose()?,
    };

    match restore_image(&baseline, &document, registry, &options)? {
        RestoreOutcome::Unchanged => {
            info!(image = %args.image.display(), "settings unchanged");
            Ok(EXIT_UNCHANGED)
        }
        RestoreOutcome::Image(bytes) => {
            let output = args.output.as_deref().unwrap_or(&args.image);
            if args.dry_run {
                info!(path = %output.display(), "dry run, skipping write");
            } else {
                write_file(output, &bytes)?;
            }
            Ok(EXIT_OK)
        }
    }
}

pub fn run_show(args: &ShowArgs) -> Result<i32, PipelineError> {
    let registry = load_registry()?;
    let raw = read_file(&args.image)?;
    let decoded = decode_image(raw, registry)?;
    let mode = warning_mode(args.ignore_warnings);
    let model = apply_target_version(decoded.model, args.target_version.as_deref(), registry, mode)?;
    let model = apply_group_filter(&model, args.groups.as_deref())?;

    let text = match args.format {
        ShowFormatArg::Json => render_document(&model, &document_options(args.indent, args.hide_pw))?,
        ShowFormatArg::Commands => {
            let schema = registry.descriptors_for(model.version())?;
            let options = command_options(args.aggregate, args.no_group_headers, args.hide_pw);
            render_commands(&model, &schema, &options)
        }
    };
    emit_text(&text, None, false)
}

pub fn run_versions() -> Result<i32, PipelineError> {
    let registry = load_registry()?;
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["From", "To", "Fields", "Layout changes"]);
    for (range, note) in dcfg_schema::table::ERAS {
        let fields = registry.descriptors_for(range.min)?.len();
        table.add_row(vec![
            range.min.to_string(),
            range.max.to_string(),
            fields.to_string(),
            (*note).to_string(),
        ]);
    }
    if let Some(column) = table.column_mut(2) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    println!("{table}");
    Ok(EXIT_OK)
}

fn warning_mode(ignore: bool) -> WarningMode {
    if ignore {
        WarningMode::Report
    } else {
        WarningMode::Fatal
    }
}

fn apply_target_version(
    model: ConfigModel,
    target: Option<&str>,
    registry: &SchemaRegistry,
    mode: WarningMode,
) -> Result<ConfigModel, PipelineError> {
    match target {
        Some(text) => {
            let version = parse_version(text)?;
            if version == model.version() {
                Ok(model)
            } else {
                migrate_model(&model, version, registry, mode)
            }
        }
        None => Ok(model),
    }
}

fn apply_group_filter(
    model: &ConfigModel,
    selection: Option<&str>,
) -> Result<ConfigModel, PipelineError> {
    let groups = parse_groups(selection.unwrap_or(""))?;
    Ok(filter_groups(model, &groups))
}

fn document_options(indent: usize, hide_pw: bool) -> DocumentOptions {
    DocumentOptions {
        indent: (indent > 0).then_some(indent),
        redact_sensitive: hide_pw,
        header: Some(DocumentHeader {
            program: format!("dcfg {}", env!("CARGO_PKG_VERSION")),
            timestamp: Utc::now(),
        }),
    }
}

fn command_options(aggregate: bool, no_group_headers: bool, hide_pw: bool) -> CommandOptions {
    CommandOptions {
        group_headers: !no_group_headers,
        aggregate,
        redact_sensitive: hide_pw,
    }
}

fn emit_text(text: &str, output: Option<&Path>, dry_run: bool) -> Result<i32, PipelineError> {
    match output {
        Some(path) if dry_run => {
            info!(path = %path.display(), "dry run, skipping write");
        }
        Some(path) => write_file(path, text.as_bytes())?,
        None => {
            print!("{text}");
            if !text.ends_with('\n') {
                println!();
            }
        }
    }
    Ok(EXIT_OK)
}
