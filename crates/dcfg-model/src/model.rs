//! The in-memory configuration model.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::group::Group;
use crate::value::ConfigValue;
use crate::version::VersionTag;

/// One decoded field of a settings image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigEntry {
    /// Schema field name.
    pub name: String,
    /// Functional group the field belongs to.
    pub group: Group,
    /// Whether the value is a secret the document codec may redact.
    pub sensitive: bool,
    /// The decoded value.
    pub value: ConfigValue,
}

/// An ordered mapping from field name to decoded value.
///
/// Entry order is the insertion order of the schema the model was decoded
/// against, never mutation order. A model is created once per logical
/// operation and treated as read-only once handed to an output codec.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigModel {
    version: VersionTag,
    entries: Vec<ConfigEntry>,
    index: HashMap<String, usize>,
}

impl ConfigModel {
    /// Create an empty model decoded against `version`.
    pub fn new(version: VersionTag) -> Self {
        Self {
            version,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// The firmware version this model was decoded against.
    pub fn version(&self) -> VersionTag {
        self.version
    }

    /// Number of fields in the model.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the model holds no fields.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry, or replace the value in place when the name exists.
    ///
    /// Replacement keeps the original position, preserving schema order.
    pub fn insert(&mut self, entry: ConfigEntry) {
        match self.index.get(&entry.name) {
            Some(&pos) => self.entries[pos] = entry,
            None => {
                self.index.insert(entry.name.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Look up an entry by field name.
    pub fn get(&self, name: &str) -> Option<&ConfigEntry> {
        self.index.get(name).map(|&pos| &self.entries[pos])
    }

    /// Look up just the value of a field.
    pub fn value(&self, name: &str) -> Option<&ConfigValue> {
        self.get(name).map(|e| &e.value)
    }

    /// Overwrite the value of an existing field. Returns false if absent.
    pub fn set_value(&mut self, name: &str, value: ConfigValue) -> bool {
        match self.index.get(name) {
            Some(&pos) => {
                self.entries[pos].value = value;
                true
            }
            None => false,
        }
    }

    /// True when the model contains a field of this name.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterate entries in schema order.
    pub fn iter(&self) -> impl Iterator<Item = &ConfigEntry> {
        self.entries.iter()
    }

    /// A new model keeping only entries the predicate accepts, same order.
    pub fn retained(&self, mut keep: impl FnMut(&ConfigEntry) -> bool) -> ConfigModel {
        let mut out = ConfigModel::new(self.version);
        for entry in &self.entries {
            if keep(entry) {
                out.insert(entry.clone());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, value: ConfigValue) -> ConfigEntry {
        ConfigEntry {
            name: name.to_string(),
            group: Group::System,
            sensitive: false,
            value,
        }
    }

    #[test]
    fn preserves_insertion_order_on_replace() {
        let mut model = ConfigModel::new(VersionTag::new(9, 1, 0, 0));
        model.insert(entry("a", ConfigValue::Integer(1)));
        model.insert(entry("b", ConfigValue::Integer(2)));
        model.insert(entry("a", ConfigValue::Integer(10)));

        let names: Vec<&str> = model.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(model.value("a"), Some(&ConfigValue::Integer(10)));
    }

    #[test]
    fn set_value_requires_existing_field() {
        let mut model = ConfigModel::new(VersionTag::new(9, 1, 0, 0));
        model.insert(entry("altitude", ConfigValue::Integer(112)));
        assert!(model.set_value("altitude", ConfigValue::Integer(0)));
        assert!(!model.set_value("missing", ConfigValue::Integer(0)));
        assert_eq!(model.value("altitude"), Some(&ConfigValue::Integer(0)));
    }

    #[test]
    fn retained_keeps_order() {
        let mut model = ConfigModel::new(VersionTag::new(9, 1, 0, 0));
        model.insert(entry("a", ConfigValue::Integer(1)));
        model.insert(entry("b", ConfigValue::Integer(2)));
        model.insert(entry("c", ConfigValue::Integer(3)));
        let kept = model.retained(|e| e.name != "b");
        let names: Vec<&str> = kept.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a", "c"]);
    }
}
