//! Property tests for the per-field codec.

use proptest::prelude::*;

use dcfg_codec::{decode_field, encode_field};
use dcfg_model::{ConfigValue, Group};
use dcfg_schema::{FieldDescriptor, FieldKind, VersionRange};

const SPAN: VersionRange = VersionRange::from_codes(0x0802_0000, 0x0C01_01FF);

fn desc(kind: FieldKind) -> FieldDescriptor {
    FieldDescriptor::new("field", Group::System, 0x20, kind, SPAN)
}

proptest! {
    #[test]
    fn u32_fields_roundtrip(value in 0u32..=u32::MAX) {
        let mut payload = vec![0u8; 0x60];
        let d = desc(FieldKind::Uint { width: 4 });
        encode_field(&d, &ConfigValue::Integer(i64::from(value)), &mut payload).unwrap();
        prop_assert_eq!(
            decode_field(&d, &payload),
            ConfigValue::Integer(i64::from(value))
        );
    }

    #[test]
    fn i16_fields_roundtrip(value in i16::MIN..=i16::MAX) {
        let mut payload = vec![0u8; 0x60];
        let d = desc(FieldKind::Int { width: 2 });
        encode_field(&d, &ConfigValue::Integer(i64::from(value)), &mut payload).unwrap();
        prop_assert_eq!(
            decode_field(&d, &payload),
            ConfigValue::Integer(i64::from(value))
        );
    }

    #[test]
    fn text_fields_roundtrip(value in "[a-zA-Z0-9_.-]{0,32}") {
        let mut payload = vec![0u8; 0x60];
        let d = desc(FieldKind::Text { len: 33 });
        encode_field(&d, &ConfigValue::text(value.clone()), &mut payload).unwrap();
        prop_assert_eq!(decode_field(&d, &payload), ConfigValue::text(value));
    }

    #[test]
    fn bit_runs_roundtrip_without_clobbering(
        value in 0u32..32,
        bit in 0u8..27,
        background in any::<u32>(),
    ) {
        let mut payload = vec![0u8; 0x60];
        payload[0x20..0x24].copy_from_slice(&background.to_le_bytes());

        let d = desc(FieldKind::Bits { bit, count: 5 });
        encode_field(&d, &ConfigValue::Integer(i64::from(value)), &mut payload).unwrap();
        prop_assert_eq!(
            decode_field(&d, &payload),
            ConfigValue::Integer(i64::from(value))
        );

        // Every bit outside the run still matches the background.
        let word = u32::from_le_bytes(payload[0x20..0x24].try_into().unwrap());
        let run_mask = 0b11111u32 << bit;
        prop_assert_eq!(word & !run_mask, background & !run_mask);
    }
}
