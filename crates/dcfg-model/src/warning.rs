//! Non-fatal warnings accumulated during migration and document merge.
//!
//! Warnings are collected into a `Vec<Warning>` and inspected once at the
//! pipeline boundary: under [`WarningMode::Fatal`] (the default) any
//! accumulated warning aborts the operation; under [`WarningMode::Report`]
//! they are surfaced in full and processing continues best-effort.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A recoverable issue found while migrating a model or merging a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Warning {
    /// A source field has no descriptor in the target schema and was dropped.
    FieldDropped { name: String },

    /// A value was narrowed to fit a smaller target field.
    Narrowing { name: String, detail: String },

    /// A document key names no field of the baseline model.
    UnknownField { name: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::FieldDropped { name } => {
                write!(f, "field {name} has no target descriptor and was dropped")
            }
            Warning::Narrowing { name, detail } => {
                write!(f, "field {name} was narrowed: {detail}")
            }
            Warning::UnknownField { name } => {
                write!(f, "unknown field in document: {name}")
            }
        }
    }
}

/// How accumulated warnings are treated at the end of a decode/merge phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WarningMode {
    /// Any warning aborts the operation with `RestoreAborted`.
    #[default]
    Fatal,
    /// Warnings are reported in full and processing continues.
    Report,
}

/// Apply the warning policy to an accumulated list.
///
/// Returns `Ok(())` when the list is empty or the mode demotes warnings;
/// otherwise `ConfigError::RestoreAborted` carrying the count. Callers are
/// expected to have surfaced every warning before invoking this.
pub fn check_warnings(warnings: &[Warning], mode: WarningMode) -> Result<(), ConfigError> {
    if warnings.is_empty() || mode == WarningMode::Report {
        Ok(())
    } else {
        Err(ConfigError::RestoreAborted {
            count: warnings.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_mode_escalates() {
        let warnings = vec![Warning::UnknownField {
            name: "bogus".to_string(),
        }];
        let err = check_warnings(&warnings, WarningMode::Fatal).unwrap_err();
        assert!(matches!(err, ConfigError::RestoreAborted { count: 1 }));
    }

    #[test]
    fn report_mode_continues() {
        let warnings = vec![Warning::FieldDropped {
            name: "old_field".to_string(),
        }];
        assert!(check_warnings(&warnings, WarningMode::Report).is_ok());
        assert!(check_warnings(&[], WarningMode::Fatal).is_ok());
    }
}
