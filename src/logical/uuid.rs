use ::uuid::Uuid;

use super::{unsupported_base, Conversion};
use crate::error::ConversionError;
use crate::schema::{Schema, SchemaKind};
use crate::value::Value;

/// `uuid`: a 16-byte `fixed` holding the most significant 64 bits then the
/// least significant, each big-endian, or a `string` in hyphenated form
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidConversion;

impl Conversion for UuidConversion {
    fn to_wire(&self, value: &Value, schema: &Schema) -> Result<Value, ConversionError> {
        let uuid = match value {
            Value::Uuid(uuid) => uuid,
            other => return Ok(other.clone()),
        };
        match schema.kind() {
            SchemaKind::Fixed(fixed) if fixed.size() == 16 => Ok(Value::Bytes(uuid.as_bytes().to_vec())),
            SchemaKind::String => Ok(Value::String(uuid.hyphenated().to_string())),
            _ => Err(unsupported_base("uuid", schema)),
        }
    }

    fn from_wire(&self, value: Value, _schema: &Schema) -> Result<Value, ConversionError> {
        if let Value::String(text) = &value {
            return Uuid::parse_str(text).map(Value::Uuid).map_err(ConversionError::new);
        }
        if let Some(bytes) = value.as_byte_slice() {
            return Uuid::from_slice(bytes).map(Value::Uuid).map_err(ConversionError::new);
        }
        Ok(value)
    }

    fn recognizes(&self, value: &Value) -> bool {
        matches!(value, Value::Uuid(_))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn uuid_fixed() -> Schema {
        Schema::fixed("UUID", 16).with_logical_type(crate::schema::LogicalType::new("uuid"))
    }

    #[test]
    fn fixed_layout_is_msb_then_lsb() {
        let msb: u64 = 0x0123_4567_89ab_cdef;
        let lsb: u64 = 0xfedc_ba98_7654_3210;
        let uuid = Uuid::from_u64_pair(msb, lsb);
        let wire = UuidConversion.to_wire(&Value::Uuid(uuid), &uuid_fixed()).unwrap();
        let mut expected = msb.to_be_bytes().to_vec();
        expected.extend_from_slice(&lsb.to_be_bytes());
        assert_eq!(wire, Value::Bytes(expected));
        assert_eq!(UuidConversion.from_wire(wire, &uuid_fixed()).unwrap(), Value::Uuid(uuid));
    }

    #[test]
    fn string_form() {
        let uuid = Uuid::from_u128(0x6ba7b810_9dad_11d1_80b4_00c04fd430c8);
        let wire = UuidConversion.to_wire(&Value::Uuid(uuid), &Schema::string()).unwrap();
        assert_eq!(wire, Value::from("6ba7b810-9dad-11d1-80b4-00c04fd430c8"));
        assert_eq!(UuidConversion.from_wire(wire, &Schema::string()).unwrap(), Value::Uuid(uuid));
        assert!(UuidConversion.from_wire(Value::from("nope"), &Schema::string()).is_err());
    }

    #[test]
    fn base_values_pass_through() {
        let raw = Value::Bytes(vec![0; 16]);
        assert_eq!(UuidConversion.to_wire(&raw, &uuid_fixed()).unwrap(), raw);
        assert!(UuidConversion.to_wire(&Value::Uuid(Uuid::nil()), &Schema::long()).is_err());
    }
}
