//! JSON settings document codec.
//!
//! A document is one ordered JSON object, one key per model entry, in
//! schema order. Values use their natural JSON types, so a document is
//! both human-editable and machine-round-trippable. The reserved
//! `"header"` key carries provenance on output and is skipped on parse,
//! which lets a rendered backup feed straight back into a restore.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use dcfg_model::{ConfigModel, ConfigValue};

/// Placeholder substituted for sensitive text when redaction is on.
pub const REDACTED: &str = "********";

/// Reserved top-level key for document provenance.
pub const HEADER_KEY: &str = "header";

/// Rendering options for [`render_document`].
#[derive(Debug, Clone)]
pub struct DocumentOptions {
    /// Spaces per indent level; `None` renders compact single-line JSON.
    pub indent: Option<usize>,
    /// Replace sensitive text values with [`REDACTED`].
    pub redact_sensitive: bool,
    /// Provenance header; `None` omits the `"header"` key entirely.
    pub header: Option<DocumentHeader>,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            indent: Some(2),
            redact_sensitive: false,
            header: None,
        }
    }
}

/// Provenance recorded under the reserved `"header"` key.
///
/// The source firmware version is taken from the model itself.
#[derive(Debug, Clone)]
pub struct DocumentHeader {
    pub program: String,
    pub timestamp: DateTime<Utc>,
}

/// Document codec failures.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The document root must be a JSON object.
    #[error("settings document is not a JSON object")]
    NotAnObject,
    /// A value has no configuration-value representation.
    #[error("unrepresentable value for field `{name}`")]
    UnsupportedValue { name: String },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Render a model as a settings document.
pub fn render_document(
    model: &ConfigModel,
    options: &DocumentOptions,
) -> Result<String, DocumentError> {
    let mut root = Map::new();
    if let Some(header) = &options.header {
        let mut block = Map::new();
        block.insert("program".to_string(), Value::String(header.program.clone()));
        block.insert(
            "timestamp".to_string(),
            Value::String(header.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)),
        );
        block.insert(
            "version".to_string(),
            Value::String(model.version().to_string()),
        );
        root.insert(HEADER_KEY.to_string(), Value::Object(block));
    }
    for entry in model.iter() {
        let value = if options.redact_sensitive && entry.sensitive {
            redacted(&entry.value)
        } else {
            entry.value.clone()
        };
        root.insert(entry.name.clone(), serde_json::to_value(value)?);
    }
    debug!(fields = model.len(), "rendered settings document");
    serialize(&Value::Object(root), options.indent)
}

/// Parse a full or partial settings document into an ordered overlay.
///
/// Key order is preserved so the overlay applies in document order. The
/// `"header"` key is reserved and skipped; every other key must carry a
/// representable value.
pub fn parse_document(text: &str) -> Result<Vec<(String, ConfigValue)>, DocumentError> {
    let root: Value = serde_json::from_str(text)?;
    let Value::Object(map) = root else {
        return Err(DocumentError::NotAnObject);
    };
    let mut overlay = Vec::with_capacity(map.len());
    for (name, value) in map {
        if name == HEADER_KEY {
            continue;
        }
        let value = serde_json::from_value(value)
            .map_err(|_| DocumentError::UnsupportedValue { name: name.clone() })?;
        overlay.push((name, value));
    }
    Ok(overlay)
}

fn redacted(value: &ConfigValue) -> ConfigValue {
    match value {
        ConfigValue::Text(_) => ConfigValue::text(REDACTED),
        ConfigValue::TextSequence(texts) => {
            ConfigValue::TextSequence(texts.iter().map(|_| REDACTED.to_string()).collect())
        }
        other => other.clone(),
    }
}

fn serialize(value: &Value, indent: Option<usize>) -> Result<String, DocumentError> {
    match indent {
        None => Ok(serde_json::to_string(value)?),
        Some(width) => {
            let pad = " ".repeat(width);
            let mut buf = Vec::new();
            let formatter = serde_json::ser::PrettyFormatter::with_indent(pad.as_bytes());
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
            value.serialize(&mut ser)?;
            Ok(String::from_utf8(buf)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use dcfg_model::{ConfigEntry, Group, VersionTag};

    fn model() -> ConfigModel {
        let mut model = ConfigModel::new(VersionTag::new(12, 0, 2, 0));
        model.insert(ConfigEntry {
            name: "hostname".to_string(),
            group: Group::Wifi,
            sensitive: false,
            value: ConfigValue::text("tasmota-1"),
        });
        model.insert(ConfigEntry {
            name: "sta_pwd".to_string(),
            group: Group::Wifi,
            sensitive: true,
            value: ConfigValue::TextSequence(vec!["hunter2".to_string(), String::new()]),
        });
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
    fn renders_in_schema_order_with_header_first() {
        let options = DocumentOptions {
            header: Some(DocumentHeader {
                program: "dcfg".to_string(),
                timestamp: Utc.with_ymd_and_hms(2026, 1, 15, 8, 30, 0).unwrap(),
            }),
            ..DocumentOptions::default()
        };
        let text = render_document(&model(), &options).unwrap();
        insta::assert_snapshot!(text, @r#"
        {
          "header": {
            "program": "dcfg",
            "timestamp": "2026-01-15T08:30:00Z",
            "version": "12.0.2"
          },
          "hostname": "tasmota-1",
          "sta_pwd": [
            "hunter2",
            ""
          ],
          "altitude": 112,
          "latitude": 48.85836
        }
        "#);
    }

    #[test]
    fn redaction_masks_sensitive_text_only() {
        let options = DocumentOptions {
            indent: None,
            redact_sensitive: true,
            header: None,
        };
        let text = render_document(&model(), &options).unwrap();
        assert!(text.contains(r#""sta_pwd":["********","********"]"#));
        assert!(text.contains(r#""hostname":"tasmota-1""#));
    }

    #[test]
    fn parse_round_trips_an_unredacted_document() {
        let options = DocumentOptions {
            indent: None,
            ..DocumentOptions::default()
        };
        let source = model();
        let text = render_document(&source, &options).unwrap();
        let overlay = parse_document(&text).unwrap();
        assert_eq!(overlay.len(), source.len());
        for ((name, value), entry) in overlay.iter().zip(source.iter()) {
            assert_eq!(name, &entry.name);
            assert_eq!(value, &entry.value);
        }
    }

    #[test]
    fn header_key_is_skipped_on_parse() {
        let text = r#"{"header": {"program": "other"}, "altitude": 7}"#;
        let overlay = parse_document(text).unwrap();
        assert_eq!(
            overlay,
            vec![("altitude".to_string(), ConfigValue::Integer(7))]
        );
    }

    #[test]
    fn non_object_root_is_rejected() {
        assert!(matches!(
            parse_document("[1, 2]"),
            Err(DocumentError::NotAnObject)
        ));
    }

    #[test]
    fn unrepresentable_value_names_the_field() {
        let err = parse_document(r#"{"altitude": {"nested": 1}}"#).unwrap_err();
        assert!(matches!(
            err,
            DocumentError::UnsupportedValue { name } if name == "altitude"
        ));
    }
}
