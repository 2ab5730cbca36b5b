//! Partial-document overlay merge.

use tracing::debug;

use dcfg_model::{ConfigError, ConfigModel, ConfigValue, Result, ValueKind, Warning};

/// Apply a parsed document overlay onto a baseline model.
///
/// Only the named keys overwrite; every other entry keeps the baseline's
/// value unchanged. Unknown keys accumulate `UnknownField` warnings (the
/// caller's warning mode decides whether those are fatal). A value whose
/// kind contradicts the baseline entry is a hard `KindMismatch` —
/// integer literals are coerced for float fields, nothing else is.
pub fn merge_overlay(
    baseline: &ConfigModel,
    overlay: &[(String, ConfigValue)],
) -> Result<(ConfigModel, Vec<Warning>)> {
    let mut model = baseline.clone();
    let mut warnings = Vec::new();

    for (name, value) in overlay {
        let Some(entry) = baseline.get(name) else {
            warnings.push(Warning::UnknownField { name: name.clone() });
            continue;
        };
        let expected = entry.value.kind();
        let value = coerce(value, expected);
        if value.kind() != expected {
            return Err(ConfigError::KindMismatch {
                field: name.clone(),
                expected,
                actual: value.kind(),
            });
        }
        model.set_value(name, value);
    }

    debug!(
        keys = overlay.len(),
        warnings = warnings.len(),
        "merged document overlay"
    );
    Ok((model, warnings))
}

/// JSON has one number type; an integer literal supplied for a float
/// field (or float elements for an int-sequence edit) is not an error.
fn coerce(value: &ConfigValue, expected: ValueKind) -> ConfigValue {
    match (value, expected) {
        (ConfigValue::Integer(n), ValueKind::Float) => ConfigValue::Float(*n as f64),
        _ => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcfg_model::{ConfigEntry, Group, VersionTag};

    fn baseline() -> ConfigModel {
        let mut model = ConfigModel::new(VersionTag::new(12, 0, 2, 0));
        model.insert(ConfigEntry {
            name: "altitude".to_string(),
            group: Group::Sensor,
            sensitive: false,
            value: ConfigValue::Integer(112),
        });
        model.insert(ConfigEntry {
            name: "latitude".to_string(),
            group: Group::Sensor,
            sensitive: false,
            value: ConfigValue::Float(48.85836),
        });
        model
    }

    #[test]
    fn overlay_touches_exactly_the_named_keys() {
        let (merged, warnings) = merge_overlay(
            &baseline(),
            &[("altitude".to_string(), ConfigValue::Integer(0))],
        )
        .unwrap();
        assert!(warnings.is_empty());
        assert_eq!(merged.value("altitude"), Some(&ConfigValue::Integer(0)));
        assert_eq!(merged.value("latitude"), Some(&ConfigValue::Float(48.85836)));
    }

    #[test]
    fn unknown_keys_warn_but_do_not_fail() {
        let (merged, warnings) = merge_overlay(
            &baseline(),
            &[("no_such_field".to_string(), ConfigValue::Integer(1))],
        )
        .unwrap();
        assert_eq!(
            warnings,
            vec![Warning::UnknownField {
                name: "no_such_field".to_string()
            }]
        );
        assert_eq!(merged.value("altitude"), Some(&ConfigValue::Integer(112)));
    }

    #[test]
    fn integer_literal_coerces_for_float_fields() {
        let (merged, _) = merge_overlay(
            &baseline(),
            &[("latitude".to_string(), ConfigValue::Integer(48))],
        )
        .unwrap();
        assert_eq!(merged.value("latitude"), Some(&ConfigValue::Float(48.0)));
    }

    #[test]
    fn contradicting_kind_is_fatal() {
        let err = merge_overlay(
            &baseline(),
            &[("altitude".to_string(), ConfigValue::text("high"))],
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::KindMismatch { .. }));
    }
}
