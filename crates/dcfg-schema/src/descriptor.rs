//! Immutable field descriptors.

use serde::Serialize;

use dcfg_model::{ConfigValue, Group, ValueKind, VersionTag};

/// Inclusive firmware version range, compared on the packed version code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VersionRange {
    pub min: VersionTag,
    pub max: VersionTag,
}

impl VersionRange {
    /// Range between two packed version codes, inclusive on both ends.
    pub const fn from_codes(min: u32, max: u32) -> Self {
        Self {
            min: VersionTag::from_code(min),
            max: VersionTag::from_code(max),
        }
    }

    /// True when `version` falls inside this range.
    pub fn contains(&self, version: VersionTag) -> bool {
        let code = version.code();
        self.min.code() <= code && code <= self.max.code()
    }

    /// True when the two ranges share at least one version code.
    pub fn overlaps(&self, other: &VersionRange) -> bool {
        self.min.code() <= other.max.code() && other.min.code() <= self.max.code()
    }
}

/// Storage kind of a field within the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldKind {
    /// Unsigned little-endian integer of `width` bytes (1, 2 or 4).
    Uint { width: usize },
    /// Signed little-endian integer of `width` bytes (1, 2 or 4).
    Int { width: usize },
    /// Signed little-endian integer presented as a float with a
    /// `10^decimals` divisor (the firmware stores e.g. microdegrees).
    Scaled { width: usize, decimals: u8 },
    /// Fixed-width NUL-terminated text of `len` bytes.
    Text { len: usize },
    /// Run of `count` bits starting at `bit` within the little-endian
    /// 32-bit carrier word at the field offset.
    Bits { bit: u8, count: u8 },
}

impl FieldKind {
    /// Bytes one element of this kind occupies.
    pub fn element_span(&self) -> usize {
        match *self {
            FieldKind::Uint { width } | FieldKind::Int { width } => width,
            FieldKind::Scaled { width, .. } => width,
            FieldKind::Text { len } => len,
            // Bit runs live inside a full carrier word.
            FieldKind::Bits { .. } => 4,
        }
    }
}

/// Default the migrator fills for a field absent from a source model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum DefaultValue {
    Int(i64),
    Float(f64),
    Text(&'static str),
    Flag(bool),
    /// Kind-appropriate zero (0, 0.0, "", false).
    Zero,
}

/// Mapping of a field into the vendor command language.
///
/// `index` distinguishes explicit members of an indexed family (e.g.
/// `SetOption0`); sequence fields instead derive indices from element
/// position at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommandSpec {
    pub name: &'static str,
    pub index: Option<u16>,
}

/// One immutable field layout record.
///
/// A field name may appear several times in the registry with different
/// offsets, widths, or kinds across version ranges; that is schema
/// evolution, not duplication. The registry guarantees the ranges for one
/// name are disjoint and contiguous.
#[derive(Debug, Clone, Serialize)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub group: Group,
    pub offset: usize,
    pub kind: FieldKind,
    /// Number of contiguous elements; > 1 makes the field a fixed array.
    pub count: usize,
    pub versions: VersionRange,
    pub default: DefaultValue,
    pub command: Option<CommandSpec>,
    pub sensitive: bool,
}

impl FieldDescriptor {
    /// Descriptor with single count, zero default, no command mapping.
    pub fn new(
        name: &'static str,
        group: Group,
        offset: usize,
        kind: FieldKind,
        versions: VersionRange,
    ) -> Self {
        Self {
            name,
            group,
            offset,
            kind,
            count: 1,
            versions,
            default: DefaultValue::Zero,
            command: None,
            sensitive: false,
        }
    }

    /// Make the field a fixed array of `count` elements.
    pub fn array(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Set the migration default.
    pub fn default(mut self, default: DefaultValue) -> Self {
        self.default = default;
        self
    }

    /// Map the field to a vendor command.
    pub fn command(mut self, name: &'static str) -> Self {
        self.command = Some(CommandSpec { name, index: None });
        self
    }

    /// Map the field to an explicit member of an indexed command family.
    pub fn indexed_command(mut self, name: &'static str, index: u16) -> Self {
        self.command = Some(CommandSpec {
            name,
            index: Some(index),
        });
        self
    }

    /// Mark the value as a secret the document codec may redact.
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Total bytes the field covers from its offset.
    pub fn byte_span(&self) -> usize {
        self.kind.element_span() * self.count
    }

    /// The [`ValueKind`] this field decodes to.
    pub fn value_kind(&self) -> ValueKind {
        match (self.kind, self.count) {
            (FieldKind::Text { .. }, c) if c > 1 => ValueKind::TextSequence,
            (FieldKind::Text { .. }, _) => ValueKind::Text,
            (FieldKind::Scaled { .. }, _) => ValueKind::Float,
            (FieldKind::Bits { count: 1, .. }, _) => ValueKind::Flag,
            (FieldKind::Bits { .. }, _) => ValueKind::Integer,
            (_, c) if c > 1 => ValueKind::IntSequence,
            _ => ValueKind::Integer,
        }
    }

    /// The concrete [`ConfigValue`] the migration default expands to.
    pub fn default_value(&self) -> ConfigValue {
        let element = match self.default {
            DefaultValue::Int(n) => ConfigValue::Integer(n),
            DefaultValue::Float(f) => ConfigValue::Float(f),
            DefaultValue::Text(s) => ConfigValue::text(s),
            DefaultValue::Flag(b) => ConfigValue::Flag(b),
            DefaultValue::Zero => match self.value_kind() {
                ValueKind::Flag => ConfigValue::Flag(false),
                ValueKind::Float => ConfigValue::Float(0.0),
                ValueKind::Text | ValueKind::TextSequence => ConfigValue::text(""),
                _ => ConfigValue::Integer(0),
            },
        };
        match self.value_kind() {
            ValueKind::IntSequence => {
                let n = element.as_integer().unwrap_or(0);
                ConfigValue::IntSequence(vec![n; self.count])
            }
            ValueKind::TextSequence => {
                let s = element.as_text().unwrap_or("").to_string();
                ConfigValue::TextSequence(vec![s; self.count])
            }
            _ => element,
        }
    }
}
