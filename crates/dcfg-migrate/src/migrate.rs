//! Cross-version schema migration.
//!
//! Migration is always a projection onto the target version's schema:
//! the result contains exactly the fields `descriptors_for(target)`
//! defines, never a superset. Values the target cannot represent are
//! narrowed with a recorded warning; source fields without a target
//! descriptor are dropped with a recorded warning, never silently kept.

use tracing::debug;

use dcfg_model::{ConfigEntry, ConfigModel, ConfigValue, Result, VersionTag, Warning};
use dcfg_schema::{FieldDescriptor, FieldKind, SchemaRegistry};

/// Project `source` onto the schema of `target`.
///
/// Succeeds for any valid source model and any supported target version;
/// unsupported targets fail closed before any field is touched.
pub fn migrate(
    source: &ConfigModel,
    target: VersionTag,
    registry: &SchemaRegistry,
) -> Result<(ConfigModel, Vec<Warning>)> {
    let schema = registry.descriptors_for(target)?;
    let mut model = ConfigModel::new(target);
    let mut warnings = Vec::new();

    for descriptor in schema.iter() {
        let value = match source.value(descriptor.name) {
            Some(value) if value.kind() == descriptor.value_kind() => {
                resize(descriptor, value, &mut warnings)
            }
            Some(_) => {
                // Reinterpreted across versions; the old representation
                // cannot be carried over.
                warnings.push(Warning::Narrowing {
                    name: descriptor.name.to_string(),
                    detail: "value kind changed between versions, default used".to_string(),
                });
                descriptor.default_value()
            }
            None => descriptor.default_value(),
        };
        model.insert(ConfigEntry {
            name: descriptor.name.to_string(),
            group: descriptor.group,
            sensitive: descriptor.sensitive,
            value,
        });
    }

    for entry in source.iter() {
        if schema.get(&entry.name).is_none() {
            warnings.push(Warning::FieldDropped {
                name: entry.name.clone(),
            });
        }
    }

    debug!(
        source = %source.version(),
        %target,
        fields = model.len(),
        warnings = warnings.len(),
        "migrated settings model"
    );
    Ok((model, warnings))
}

/// Fit a kind-matching value to the target descriptor's width and count.
fn resize(
    descriptor: &FieldDescriptor,
    value: &ConfigValue,
    warnings: &mut Vec<Warning>,
) -> ConfigValue {
    match value {
        ConfigValue::Integer(n) => {
            let (fitted, narrowed) = fit_integer(descriptor, *n);
            if narrowed {
                warnings.push(narrowing(descriptor, format!("{n} truncated to {fitted}")));
            }
            ConfigValue::Integer(fitted)
        }
        ConfigValue::IntSequence(values) => {
            let mut out = Vec::with_capacity(descriptor.count);
            let mut narrowed = false;
            for n in values.iter().take(descriptor.count) {
                let (fitted, clipped) = fit_integer(descriptor, *n);
                narrowed |= clipped;
                out.push(fitted);
            }
            if values.len() > descriptor.count {
                narrowed = true;
            }
            // Widened arrays keep the overlapping prefix and default-fill
            // the remainder.
            if out.len() < descriptor.count {
                let fill = descriptor.default_value();
                let fill = match fill {
                    ConfigValue::IntSequence(defaults) => {
                        defaults.first().copied().unwrap_or_default()
                    }
                    _ => 0,
                };
                out.resize(descriptor.count, fill);
            }
            if narrowed {
                warnings.push(narrowing(
                    descriptor,
                    format!("{} elements fitted to {}", values.len(), descriptor.count),
                ));
            }
            ConfigValue::IntSequence(out)
        }
        ConfigValue::Text(s) => ConfigValue::Text(fit_text(descriptor, s, warnings)),
        ConfigValue::TextSequence(texts) => {
            let mut out: Vec<String> = texts
                .iter()
                .take(descriptor.count)
                .map(|s| fit_text(descriptor, s, warnings))
                .collect();
            if texts.len() > descriptor.count {
                warnings.push(narrowing(
                    descriptor,
                    format!("{} elements fitted to {}", texts.len(), descriptor.count),
                ));
            }
            if out.len() < descriptor.count {
                let fill = match descriptor.default_value() {
                    ConfigValue::TextSequence(defaults) => {
                        defaults.into_iter().next().unwrap_or_default()
                    }
                    _ => String::new(),
                };
                out.resize(descriptor.count, fill);
            }
            ConfigValue::TextSequence(out)
        }
        // Floats and flags carry no width to reconcile.
        other => other.clone(),
    }
}

/// Truncate an integer into the target field's representable range.
fn fit_integer(descriptor: &FieldDescriptor, value: i64) -> (i64, bool) {
    let fitted = match descriptor.kind {
        FieldKind::Uint { width } => {
            let bits = 8 * width as u32;
            let mask = if bits == 64 { u64::MAX } else { (1u64 << bits) - 1 };
            (value as u64 & mask) as i64
        }
        FieldKind::Int { width } => {
            let shift = 64 - 8 * width as u32;
            (value << shift) >> shift
        }
        FieldKind::Bits { count, .. } => {
            let mask = if count >= 32 {
                u64::from(u32::MAX)
            } else {
                (1u64 << count) - 1
            };
            (value as u64 & mask) as i64
        }
        _ => value,
    };
    (fitted, fitted != value)
}

/// Truncate text to the target field's width. A value filling the whole
/// field is still encodable, stored unterminated.
fn fit_text(descriptor: &FieldDescriptor, value: &str, warnings: &mut Vec<Warning>) -> String {
    let capacity = match descriptor.kind {
        FieldKind::Text { len } => len,
        _ => return value.to_string(),
    };
    if value.len() <= capacity {
        return value.to_string();
    }
    // Cut on a char boundary at or below the byte capacity.
    let mut end = capacity;
    while end > 0 && !value.is_char_boundary(end) {
        end -= 1;
    }
    warnings.push(narrowing(
        descriptor,
        format!("text truncated from {} to {} bytes", value.len(), end),
    ));
    value[..end].to_string()
}

fn narrowing(descriptor: &FieldDescriptor, detail: String) -> Warning {
    Warning::Narrowing {
        name: descriptor.name.to_string(),
        detail,
    }
}
