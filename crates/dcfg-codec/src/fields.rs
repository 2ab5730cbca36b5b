//! Decode and encode of one typed value per field descriptor.

use dcfg_model::{ConfigError, ConfigValue, Result, ValueKind};
use dcfg_schema::{FieldDescriptor, FieldKind};

/// Decode the value of `descriptor` out of a payload.
///
/// Bounds are a build-time invariant of the registry, so reads here index
/// directly.
pub fn decode_field(descriptor: &FieldDescriptor, payload: &[u8]) -> ConfigValue {
    match descriptor.kind {
        FieldKind::Uint { width } => decode_int_family(descriptor, payload, width, false),
        FieldKind::Int { width } => decode_int_family(descriptor, payload, width, true),
        FieldKind::Scaled { width, decimals } => {
            let raw = read_int(payload, descriptor.offset, width, true);
            ConfigValue::Float(raw as f64 / 10f64.powi(i32::from(decimals)))
        }
        FieldKind::Text { len } => {
            if descriptor.count > 1 {
                let texts = (0..descriptor.count)
                    .map(|i| read_text(payload, descriptor.offset + i * len, len))
                    .collect();
                ConfigValue::TextSequence(texts)
            } else {
                ConfigValue::Text(read_text(payload, descriptor.offset, len))
            }
        }
        FieldKind::Bits { bit, count } => {
            let word = read_int(payload, descriptor.offset, 4, false) as u32;
            let value = (word >> bit) & mask(count);
            if count == 1 {
                ConfigValue::Flag(value != 0)
            } else {
                ConfigValue::Integer(i64::from(value))
            }
        }
    }
}

/// Encode `value` into the payload region of `descriptor`.
///
/// Fails with `KindMismatch` for a wrong variant, `LengthMismatch` for a
/// wrong sequence length, `ValueTooLong` for oversized text, and
/// `EncodeFailure` for integers outside the field's representable range.
pub fn encode_field(
    descriptor: &FieldDescriptor,
    value: &ConfigValue,
    payload: &mut [u8],
) -> Result<()> {
    let expected = descriptor.value_kind();
    if value.kind() != expected {
        return Err(ConfigError::KindMismatch {
            field: descriptor.name.to_string(),
            expected,
            actual: value.kind(),
        });
    }

    match (&descriptor.kind, value) {
        (FieldKind::Uint { width }, ConfigValue::Integer(n)) => {
            write_int(descriptor, payload, descriptor.offset, *width, *n, false)
        }
        (FieldKind::Int { width }, ConfigValue::Integer(n)) => {
            write_int(descriptor, payload, descriptor.offset, *width, *n, true)
        }
        (FieldKind::Uint { width }, ConfigValue::IntSequence(values))
        | (FieldKind::Int { width }, ConfigValue::IntSequence(values)) => {
            if values.len() != descriptor.count {
                return Err(ConfigError::LengthMismatch {
                    field: descriptor.name.to_string(),
                    expected: descriptor.count,
                    actual: values.len(),
                });
            }
            let signed = matches!(descriptor.kind, FieldKind::Int { .. });
            for (i, n) in values.iter().enumerate() {
                write_int(
                    descriptor,
                    payload,
                    descriptor.offset + i * width,
                    *width,
                    *n,
                    signed,
                )?;
            }
            Ok(())
        }
        (FieldKind::Scaled { width, decimals }, ConfigValue::Float(f)) => {
            let raw = (f * 10f64.powi(i32::from(*decimals))).round() as i64;
            write_int(descriptor, payload, descriptor.offset, *width, raw, true)
        }
        (FieldKind::Text { len }, ConfigValue::Text(s)) => {
            write_text(descriptor, payload, descriptor.offset, *len, s)
        }
        (FieldKind::Text { len }, ConfigValue::TextSequence(texts)) => {
            if texts.len() != descriptor.count {
                return Err(ConfigError::LengthMismatch {
                    field: descriptor.name.to_string(),
                    expected: descriptor.count,
                    actual: texts.len(),
                });
            }
            for (i, s) in texts.iter().enumerate() {
                write_text(descriptor, payload, descriptor.offset + i * len, *len, s)?;
            }
            Ok(())
        }
        (FieldKind::Bits { bit, count }, value) => {
            let raw = match value {
                ConfigValue::Flag(b) => u32::from(*b),
                ConfigValue::Integer(n) => {
                    u32::try_from(*n).map_err(|_| out_of_range(descriptor))?
                }
                // Kind check above leaves only Flag/Integer here.
                _ => return Err(out_of_range(descriptor)),
            };
            if raw > mask(*count) {
                return Err(out_of_range(descriptor));
            }
            let mut word = read_int(payload, descriptor.offset, 4, false) as u32;
            word &= !(mask(*count) << bit);
            word |= raw << bit;
            payload[descriptor.offset..descriptor.offset + 4]
                .copy_from_slice(&word.to_le_bytes());
            Ok(())
        }
        // Unreachable after the kind check; keep the error total.
        _ => Err(out_of_range(descriptor)),
    }
}

fn mask(count: u8) -> u32 {
    if count >= 32 {
        u32::MAX
    } else {
        (1u32 << count) - 1
    }
}

fn out_of_range(descriptor: &FieldDescriptor) -> ConfigError {
    ConfigError::EncodeFailure {
        field: descriptor.name.to_string(),
        message: "value out of range for field width".to_string(),
    }
}

/// Little-endian integer read of `width` bytes, optionally sign-extended.
fn read_int(payload: &[u8], offset: usize, width: usize, signed: bool) -> i64 {
    let mut raw: u64 = 0;
    for (i, &byte) in payload[offset..offset + width].iter().enumerate() {
        raw |= u64::from(byte) << (8 * i);
    }
    if signed {
        let shift = 64 - 8 * width as u32;
        ((raw << shift) as i64) >> shift
    } else {
        raw as i64
    }
}

fn write_int(
    descriptor: &FieldDescriptor,
    payload: &mut [u8],
    offset: usize,
    width: usize,
    value: i64,
    signed: bool,
) -> Result<()> {
    let fits = if signed {
        let bits = 8 * width as u32;
        let min = -(1i64 << (bits - 1));
        let max = (1i64 << (bits - 1)) - 1;
        value >= min && value <= max
    } else {
        value >= 0 && (width == 8 || value < (1i64 << (8 * width as u32)))
    };
    if !fits {
        return Err(out_of_range(descriptor));
    }
    let bytes = value.to_le_bytes();
    payload[offset..offset + width].copy_from_slice(&bytes[..width]);
    Ok(())
}

/// Decode fixed-width text up to the first NUL, or the full width when
/// unterminated.
fn read_text(payload: &[u8], offset: usize, len: usize) -> String {
    let field = &payload[offset..offset + len];
    let end = field.iter().position(|&b| b == 0).unwrap_or(len);
    String::from_utf8_lossy(&field[..end]).into_owned()
}

/// Encode text NUL-padded; a value filling the whole field is stored
/// unterminated, mirroring [`read_text`].
fn write_text(
    descriptor: &FieldDescriptor,
    payload: &mut [u8],
    offset: usize,
    len: usize,
    value: &str,
) -> Result<()> {
    let bytes = value.as_bytes();
    if bytes.len() > len {
        return Err(ConfigError::ValueTooLong {
            field: descriptor.name.to_string(),
            max: len,
            actual: bytes.len(),
        });
    }
    let field = &mut payload[offset..offset + len];
    field.fill(0);
    field[..bytes.len()].copy_from_slice(bytes);
    Ok(())
}

fn decode_int_family(
    descriptor: &FieldDescriptor,
    payload: &[u8],
    width: usize,
    signed: bool,
) -> ConfigValue {
    if descriptor.count > 1 {
        let values = (0..descriptor.count)
            .map(|i| read_int(payload, descriptor.offset + i * width, width, signed))
            .collect();
        ConfigValue::IntSequence(values)
    } else {
        ConfigValue::Integer(read_int(payload, descriptor.offset, width, signed))
    }
}
