//! Decoded configuration values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A decoded or edited configuration value.
///
/// Every field, regardless of the firmware version it was decoded from,
/// is represented by one of these variants. Codecs and migration rules
/// match exhaustively over this type.
///
/// The untagged serde representation maps each variant to its natural
/// JSON type, which is exactly the document format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// On/off flag (single bit in the image).
    Flag(bool),
    /// Integer of any firmware width, widened to i64.
    Integer(i64),
    /// Scaled fixed-point value presented as a float.
    Float(f64),
    /// Fixed-width NUL-terminated text.
    Text(String),
    /// Fixed array of integers.
    IntSequence(Vec<i64>),
    /// Fixed array of texts.
    TextSequence(Vec<String>),
}

impl ConfigValue {
    /// The kind discriminant of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            ConfigValue::Flag(_) => ValueKind::Flag,
            ConfigValue::Integer(_) => ValueKind::Integer,
            ConfigValue::Float(_) => ValueKind::Float,
            ConfigValue::Text(_) => ValueKind::Text,
            ConfigValue::IntSequence(_) => ValueKind::IntSequence,
            ConfigValue::TextSequence(_) => ValueKind::TextSequence,
        }
    }

    /// Convenience constructor for text values.
    pub fn text(s: impl Into<String>) -> Self {
        ConfigValue::Text(s.into())
    }

    /// The integer payload, if this is an `Integer`.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// The text payload, if this is a `Text`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ConfigValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Kind discriminant for [`ConfigValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Flag,
    Integer,
    Float,
    Text,
    IntSequence,
    TextSequence,
}

impl ValueKind {
    /// Human-readable kind name used in error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Flag => "flag",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::Text => "text",
            ValueKind::IntSequence => "integer sequence",
            ValueKind::TextSequence => "text sequence",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(ConfigValue::Flag(true).kind(), ValueKind::Flag);
        assert_eq!(ConfigValue::Integer(7).kind(), ValueKind::Integer);
        assert_eq!(ConfigValue::text("ssid").kind(), ValueKind::Text);
        assert_eq!(
            ConfigValue::IntSequence(vec![1, 2]).kind(),
            ValueKind::IntSequence
        );
    }

    #[test]
    fn serializes_to_natural_json() {
        assert_eq!(
            serde_json::to_string(&ConfigValue::Flag(true)).unwrap(),
            "true"
        );
        assert_eq!(
            serde_json::to_string(&ConfigValue::Integer(112)).unwrap(),
            "112"
        );
        assert_eq!(
            serde_json::to_string(&ConfigValue::text("iot")).unwrap(),
            "\"iot\""
        );
    }

    #[test]
    fn deserializes_bool_before_integer() {
        let v: ConfigValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, ConfigValue::Flag(true));
        let v: ConfigValue = serde_json::from_str("42").unwrap();
        assert_eq!(v, ConfigValue::Integer(42));
        let v: ConfigValue = serde_json::from_str("48.85836").unwrap();
        assert_eq!(v, ConfigValue::Float(48.85836));
    }
}
