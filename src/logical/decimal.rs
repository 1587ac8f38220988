use num_bigint::{BigInt, Sign};

use super::{unsupported_base, Conversion};
use crate::error::ConversionError;
use crate::schema::{Schema, SchemaKind};
use crate::value::{Decimal, Value};

/// `decimal`: the two's-complement big-endian unscaled integer, as `bytes`
/// or as a sign-extended `fixed`, with the scale taken from the schema
#[derive(Clone, Copy, Debug, Default)]
pub struct DecimalConversion;

fn schema_scale(schema: &Schema) -> Result<u32, ConversionError> {
    let raw = schema
        .logical_type()
        .and_then(|logical| logical.param("scale"))
        .unwrap_or(0);
    u32::try_from(raw).map_err(|_| ConversionError::msg(format!("invalid decimal scale {raw}")))
}

fn sign_extend(unscaled: &BigInt, bytes: Vec<u8>, size: usize) -> Result<Vec<u8>, ConversionError> {
    if bytes.len() > size {
        return Err(ConversionError::msg(format!(
            "decimal {unscaled} needs {} bytes, more than the fixed size of {size}",
            bytes.len()
        )));
    }
    let fill = if unscaled.sign() == Sign::Minus { 0xff } else { 0x00 };
    let mut out = vec![fill; size - bytes.len()];
    out.extend(bytes);
    Ok(out)
}

impl Conversion for DecimalConversion {
    fn to_wire(&self, value: &Value, schema: &Schema) -> Result<Value, ConversionError> {
        let Value::Decimal(dec) = value else {
            return Ok(value.clone());
        };
        let scale = schema_scale(schema)?;
        if dec.scale() != scale {
            return Err(ConversionError::msg(format!(
                "decimal {dec} has scale {}, schema requires scale {scale}",
                dec.scale()
            )));
        }
        let bytes = dec.unscaled().to_signed_bytes_be();
        match schema.kind() {
            SchemaKind::Bytes => Ok(Value::Bytes(bytes)),
            SchemaKind::Fixed(fixed) => sign_extend(dec.unscaled(), bytes, fixed.size()).map(Value::Bytes),
            _ => Err(unsupported_base("decimal", schema)),
        }
    }

    fn from_wire(&self, value: Value, schema: &Schema) -> Result<Value, ConversionError> {
        let Some(bytes) = value.as_byte_slice() else {
            return Ok(value);
        };
        let unscaled = BigInt::from_signed_bytes_be(bytes);
        Ok(Value::Decimal(Decimal::new(unscaled, schema_scale(schema)?)))
    }

    fn recognizes(&self, value: &Value) -> bool {
        matches!(value, Value::Decimal(_))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::schema::LogicalType;

    fn money_bytes() -> Schema {
        Schema::bytes().with_logical_type(LogicalType::decimal(9, 2))
    }

    #[test]
    fn bytes_are_minimal() {
        let dec = Value::Decimal(Decimal::new(-1, 2));
        let wire = DecimalConversion.to_wire(&dec, &money_bytes()).unwrap();
        assert_eq!(wire, Value::Bytes(vec![0xff]));
        assert_eq!(DecimalConversion.from_wire(wire, &money_bytes()).unwrap(), dec);
    }

    #[test]
    fn fixed_is_sign_extended() {
        let schema = Schema::fixed("Money", 4).with_logical_type(LogicalType::decimal(9, 2));
        let neg = Value::Decimal(Decimal::new(-256, 2));
        assert_eq!(
            DecimalConversion.to_wire(&neg, &schema).unwrap(),
            Value::Bytes(vec![0xff, 0xff, 0xff, 0x00])
        );
        let pos = Value::Decimal(Decimal::new(12345, 2));
        let wire = DecimalConversion.to_wire(&pos, &schema).unwrap();
        assert_eq!(wire, Value::Bytes(vec![0x00, 0x00, 0x30, 0x39]));
        assert_eq!(DecimalConversion.from_wire(wire, &schema).unwrap(), pos);
    }

    #[test]
    fn scale_must_match() {
        let dec = Value::Decimal(Decimal::new(5, 3));
        assert!(DecimalConversion.to_wire(&dec, &money_bytes()).is_err());
    }

    #[test]
    fn too_wide_for_fixed() {
        let schema = Schema::fixed("Tiny", 1).with_logical_type(LogicalType::decimal(2, 0));
        let dec = Value::Decimal(Decimal::new(1000, 0));
        assert!(DecimalConversion.to_wire(&dec, &schema).is_err());
    }
}
