//! Version-indexed descriptor lookup with build-time validation.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use dcfg_model::{ConfigError, ValueKind, VersionTag};

use crate::descriptor::{DefaultValue, FieldDescriptor, FieldKind, VersionRange};
use crate::error::SchemaError;
use crate::geometry::IMAGE_SIZE;
use crate::table;

/// The validated, ordered set of field descriptors for every supported
/// firmware version.
///
/// Lookup is a pure function of version; the registry holds no mutable
/// state after construction.
#[derive(Debug)]
pub struct SchemaRegistry {
    descriptors: Vec<FieldDescriptor>,
    supported: VersionRange,
}

impl SchemaRegistry {
    /// Build the registry from the built-in layout table.
    pub fn new() -> Result<Self, SchemaError> {
        Self::from_descriptors(table::descriptors(), table::SUPPORTED)
    }

    /// Build a registry from an explicit descriptor set, validating every
    /// build-time invariant of the table.
    pub fn from_descriptors(
        descriptors: Vec<FieldDescriptor>,
        supported: VersionRange,
    ) -> Result<Self, SchemaError> {
        validate(&descriptors, supported)?;
        Ok(Self {
            descriptors,
            supported,
        })
    }

    /// The inclusive version span the registry covers.
    pub fn supported(&self) -> VersionRange {
        self.supported
    }

    /// All descriptor records, every era included, in table order.
    pub fn all(&self) -> &[FieldDescriptor] {
        &self.descriptors
    }

    /// The ordered descriptor set applying to `version`.
    ///
    /// Versions outside the supported span fail closed with
    /// [`ConfigError::UnsupportedVersion`].
    pub fn descriptors_for(&self, version: VersionTag) -> Result<SchemaVersion<'_>, ConfigError> {
        if !self.supported.contains(version) {
            return Err(ConfigError::UnsupportedVersion(version));
        }
        let fields: Vec<&FieldDescriptor> = self
            .descriptors
            .iter()
            .filter(|d| d.versions.contains(version))
            .collect();
        Ok(SchemaVersion { version, fields })
    }
}

/// The descriptor set of one concrete firmware version, in schema order.
#[derive(Debug)]
pub struct SchemaVersion<'a> {
    version: VersionTag,
    fields: Vec<&'a FieldDescriptor>,
}

impl<'a> SchemaVersion<'a> {
    /// The version this set was selected for.
    pub fn version(&self) -> VersionTag {
        self.version
    }

    /// Number of fields in this version's schema.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the schema is empty (never the case for a valid table).
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate descriptors in schema order.
    pub fn iter(&self) -> impl Iterator<Item = &'a FieldDescriptor> + '_ {
        self.fields.iter().copied()
    }

    /// Look up one descriptor by field name.
    pub fn get(&self, name: &str) -> Option<&'a FieldDescriptor> {
        self.fields.iter().copied().find(|d| d.name == name)
    }
}

static REGISTRY: OnceLock<Result<SchemaRegistry, SchemaError>> = OnceLock::new();

/// The process-wide registry, built and validated on first access.
pub fn registry() -> Result<&'static SchemaRegistry, SchemaError> {
    REGISTRY
        .get_or_init(SchemaRegistry::new)
        .as_ref()
        .map_err(Clone::clone)
}

fn validate(descriptors: &[FieldDescriptor], supported: VersionRange) -> Result<(), SchemaError> {
    for d in descriptors {
        validate_shape(d)?;
        if !supported.contains(d.versions.min) || !supported.contains(d.versions.max) {
            return Err(SchemaError::RangeOutOfSpan { field: d.name });
        }
    }
    validate_ranges(descriptors)?;
    validate_commands(descriptors)?;
    Ok(())
}

/// Per-descriptor checks: bounds, widths, bit runs, default kinds.
fn validate_shape(d: &FieldDescriptor) -> Result<(), SchemaError> {
    match d.kind {
        FieldKind::Uint { width } | FieldKind::Int { width } => {
            if !matches!(width, 1 | 2 | 4) {
                return Err(SchemaError::InvalidWidth {
                    field: d.name,
                    width,
                });
            }
        }
        FieldKind::Scaled { width, .. } => {
            if !matches!(width, 2 | 4) {
                return Err(SchemaError::InvalidWidth {
                    field: d.name,
                    width,
                });
            }
            if d.count > 1 {
                return Err(SchemaError::InvalidArrayKind { field: d.name });
            }
        }
        FieldKind::Text { len } => {
            if len == 0 {
                return Err(SchemaError::InvalidWidth {
                    field: d.name,
                    width: len,
                });
            }
        }
        FieldKind::Bits { bit, count } => {
            if count == 0 || u32::from(bit) + u32::from(count) > 32 {
                return Err(SchemaError::InvalidBitRun {
                    field: d.name,
                    bit,
                    count,
                });
            }
            if d.count > 1 {
                return Err(SchemaError::InvalidArrayKind { field: d.name });
            }
        }
    }

    if d.offset + d.byte_span() > IMAGE_SIZE {
        return Err(SchemaError::OutOfBounds {
            field: d.name,
            offset: d.offset,
            span: d.byte_span(),
        });
    }

    let default_kind = match d.default {
        DefaultValue::Int(_) => Some(ValueKind::Integer),
        DefaultValue::Float(_) => Some(ValueKind::Float),
        DefaultValue::Text(_) => Some(ValueKind::Text),
        DefaultValue::Flag(_) => Some(ValueKind::Flag),
        DefaultValue::Zero => None,
    };
    if let Some(kind) = default_kind {
        let element_kind = match d.value_kind() {
            ValueKind::IntSequence => ValueKind::Integer,
            ValueKind::TextSequence => ValueKind::Text,
            other => other,
        };
        if kind != element_kind {
            return Err(SchemaError::DefaultKindMismatch { field: d.name });
        }
    }
    Ok(())
}

/// Per-name checks: version ranges must be pairwise disjoint and
/// contiguous (`next.min == prev.max + 1`).
fn validate_ranges(descriptors: &[FieldDescriptor]) -> Result<(), SchemaError> {
    let mut by_name: BTreeMap<&'static str, Vec<&VersionRange>> = BTreeMap::new();
    for d in descriptors {
        by_name.entry(d.name).or_default().push(&d.versions);
    }
    for (name, mut ranges) in by_name {
        ranges.sort_by_key(|r| r.min.code());
        for pair in ranges.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if prev.overlaps(next) {
                return Err(SchemaError::OverlappingRanges { field: name });
            }
            if next.min.code() != prev.max.code().wrapping_add(1) {
                return Err(SchemaError::RangeGap { field: name });
            }
        }
    }
    Ok(())
}

/// No two descriptors valid for the same version may map to the same
/// (command, index) pair.
fn validate_commands(descriptors: &[FieldDescriptor]) -> Result<(), SchemaError> {
    for (i, a) in descriptors.iter().enumerate() {
        let Some(ca) = a.command else { continue };
        for b in &descriptors[i + 1..] {
            let Some(cb) = b.command else { continue };
            if ca == cb && a.name != b.name && a.versions.overlaps(&b.versions) {
                return Err(SchemaError::DuplicateCommand {
                    command: ca.name,
                    index: ca.index.map(|n| n.to_string()).unwrap_or_default(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcfg_model::Group;

    const SPAN: VersionRange = VersionRange::from_codes(0x0100_0000, 0x02FF_FFFF);

    fn field(name: &'static str, range: VersionRange) -> FieldDescriptor {
        FieldDescriptor::new(name, Group::System, 0x10, FieldKind::Uint { width: 1 }, range)
    }

    #[test]
    fn builtin_table_validates() {
        let registry = SchemaRegistry::new().unwrap();
        assert!(!registry.all().is_empty());
    }

    #[test]
    fn rejects_out_of_bounds() {
        let d = FieldDescriptor::new(
            "beyond",
            Group::System,
            IMAGE_SIZE - 1,
            FieldKind::Uint { width: 2 },
            SPAN,
        );
        let err = SchemaRegistry::from_descriptors(vec![d], SPAN).unwrap_err();
        assert!(matches!(err, SchemaError::OutOfBounds { field: "beyond", .. }));
    }

    #[test]
    fn rejects_overlapping_ranges() {
        let descriptors = vec![
            field("dup", VersionRange::from_codes(0x0100_0000, 0x0200_0000)),
            field("dup", VersionRange::from_codes(0x0150_0000, 0x02FF_FFFF)),
        ];
        let err = SchemaRegistry::from_descriptors(descriptors, SPAN).unwrap_err();
        assert!(matches!(err, SchemaError::OverlappingRanges { field: "dup" }));
    }

    #[test]
    fn rejects_range_gaps() {
        let descriptors = vec![
            field("gap", VersionRange::from_codes(0x0100_0000, 0x0150_0000)),
            field("gap", VersionRange::from_codes(0x0160_0000, 0x02FF_FFFF)),
        ];
        let err = SchemaRegistry::from_descriptors(descriptors, SPAN).unwrap_err();
        assert!(matches!(err, SchemaError::RangeGap { field: "gap" }));
    }

    #[test]
    fn unsupported_version_fails_closed() {
        let registry = SchemaRegistry::new().unwrap();
        let too_old = VersionTag::new(6, 5, 0, 0);
        let err = registry.descriptors_for(too_old).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedVersion(_)));
    }

    #[test]
    fn evolving_fields_resolve_per_era() {
        let registry = SchemaRegistry::new().unwrap();

        let era_a = registry
            .descriptors_for(VersionTag::new(8, 5, 0, 0))
            .unwrap();
        let era_c = registry
            .descriptors_for(VersionTag::new(12, 0, 2, 0))
            .unwrap();

        // web_password widened from 33 to 65 bytes.
        assert_eq!(
            era_a.get("web_password").unwrap().kind,
            FieldKind::Text { len: 33 }
        );
        assert_eq!(
            era_c.get("web_password").unwrap().kind,
            FieldKind::Text { len: 65 }
        );

        // mqtt_topic moved offsets; same name, one descriptor per era.
        assert_eq!(era_a.get("mqtt_topic").unwrap().offset, 0x20C);
        assert_eq!(era_c.get("mqtt_topic").unwrap().offset, 0x240);

        // Fields introduced/retired mid-span.
        assert!(era_a.get("device_name").is_none());
        assert!(era_c.get("device_name").is_some());
        assert!(era_a.get("ex_adc_param").is_some());
        assert!(era_c.get("ex_adc_param").is_none());
    }
}
