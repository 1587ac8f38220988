//! Union branch selection
//!
//! The branch written is the first one, in declared order, whose shape
//! accepts the value. Integral values only match an `int` branch when they
//! fit in 32 bits. A branch with a registered logical type also accepts any
//! native value its conversion recognizes.

use super::record::declared_keys;
use super::DatumWriter;
use crate::schema::{RecordSchema, Schema, SchemaKind, UnionSchema};
use crate::value::Value;

fn record_accepts(writer: &DatumWriter<'_>, record: &RecordSchema, value: &Value) -> bool {
    let arity = record.fields().len();
    match value {
        Value::Map(entries) => {
            let declared = declared_keys(writer, record);
            entries.keys().all(|key| declared.contains(key.as_str()))
        }
        Value::Array(items) => items.len() == arity,
        Value::NumericArray(items) => items.len() == arity,
        _ => false,
    }
}

/// Returns `true` if `branch` can hold `value`
pub(crate) fn branch_accepts(writer: &DatumWriter<'_>, branch: &Schema, value: &Value) -> bool {
    let value = value.unannotated();
    if let Some(conversion) = writer.registry().conversion_for(branch) {
        if conversion.recognizes(value) {
            return true;
        }
    }
    match (branch.kind(), value) {
        (SchemaKind::Null, Value::Null) => true,
        (SchemaKind::Boolean, Value::Boolean(_)) => true,
        (SchemaKind::Int, Value::Int(_)) => true,
        (SchemaKind::Int, Value::Long(n)) => i32::try_from(*n).is_ok(),
        (SchemaKind::Long, Value::Int(_) | Value::Long(_)) => true,
        (SchemaKind::Float | SchemaKind::Double, Value::Float(_) | Value::Double(_)) => true,
        (SchemaKind::Bytes, Value::Bytes(_) | Value::ByteView(_)) => true,
        (SchemaKind::Fixed(fixed), _) => value
            .byte_like()
            .map_or(false, |bytes| bytes.byte_len() == fixed.size()),
        (SchemaKind::String, Value::String(_) | Value::Symbol(_)) => true,
        (SchemaKind::Enum(enumeration), _) => value
            .as_name()
            .map_or(false, |name| enumeration.ordinal(&writer.names().mangle(name)).is_some()),
        (SchemaKind::Array(_), Value::Array(_) | Value::NumericArray(_)) => true,
        (SchemaKind::Map(_), Value::Map(_)) => true,
        (SchemaKind::Record(record), _) => record_accepts(writer, record, value),
        _ => false,
    }
}

/// Index of the first branch of `union` that accepts `value`
pub(super) fn select_branch(writer: &DatumWriter<'_>, union: &UnionSchema, value: &Value) -> Option<usize> {
    union
        .branches()
        .iter()
        .position(|branch| branch_accepts(writer, branch, value))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::MismatchKind;
    use crate::logical::LogicalTypeRegistry;
    use crate::schema::{Field, LogicalType};

    fn writer() -> DatumWriter<'static> {
        DatumWriter::new(LogicalTypeRegistry::standard())
    }

    fn nullable_int() -> Schema {
        Schema::union(vec![Schema::null(), Schema::int()]).unwrap()
    }

    #[test]
    fn optional_values() {
        let w = writer();
        assert_eq!(w.to_bytes(&nullable_int(), &Value::Null).unwrap(), vec![0x00]);
        assert_eq!(w.to_bytes(&nullable_int(), &Value::Int(1)).unwrap(), vec![0x02, 0x02]);
    }

    #[test]
    fn first_declared_match_wins() {
        let schema = Schema::union(vec![Schema::long(), Schema::int()]).unwrap();
        let w = writer();
        assert_eq!(select_branch(&w, union_of(&schema), &Value::Int(3)), Some(0));
    }

    #[test]
    fn wide_longs_skip_int_branch() {
        let schema = Schema::union(vec![Schema::int(), Schema::long()]).unwrap();
        let w = writer();
        assert_eq!(select_branch(&w, union_of(&schema), &Value::Long(1 << 40)), Some(1));
        assert_eq!(select_branch(&w, union_of(&schema), &Value::Long(7)), Some(0));
    }

    #[test]
    fn records_by_declared_keys() {
        let point = Schema::record(
            "Point",
            vec![Field::new("x", Schema::int()), Field::new("y", Schema::int())],
        );
        let schema = Schema::union(vec![Schema::null(), point]).unwrap();
        let w = writer();
        let named = Value::record([("x", Value::Int(1)), ("y", Value::Int(2))]);
        assert_eq!(select_branch(&w, union_of(&schema), &named), Some(1));
        let stray = Value::record([("x", Value::Int(1)), ("z", Value::Int(2))]);
        assert_eq!(select_branch(&w, union_of(&schema), &stray), None);
        assert_eq!(select_branch(&w, union_of(&schema), &Value::Array(vec![Value::Int(1)])), None);
    }

    #[test]
    fn records_by_field_keys() {
        let address = Schema::record("Address", vec![Field::new("zip_code", Schema::string())]);
        let schema = Schema::union(vec![Schema::null(), address]).unwrap();
        let w = writer().with_names(crate::names::DashUnderscore);
        let keyed = Value::record([("zip-code", Value::from("12345"))]);
        assert_eq!(select_branch(&w, union_of(&schema), &keyed), Some(1));
        let wire = Value::record([("zip_code", Value::from("12345"))]);
        assert_eq!(select_branch(&w, union_of(&schema), &wire), None);
    }

    #[test]
    fn logical_branches_recognize_native_values() {
        let ts = Schema::long().with_logical_type(LogicalType::new("timestamp-millis"));
        let schema = Schema::union(vec![Schema::null(), Schema::string(), ts]).unwrap();
        let w = writer();
        let now = Value::Timestamp(chrono::DateTime::from_timestamp(0, 0).unwrap());
        assert_eq!(select_branch(&w, union_of(&schema), &now), Some(2));
        assert_eq!(w.to_bytes(&schema, &now).unwrap(), vec![0x04, 0x00]);
    }

    #[test]
    fn no_branch() {
        let err = writer().to_bytes(&nullable_int(), &Value::from("x")).unwrap_err();
        assert_eq!(err.mismatch_kind(), Some(&MismatchKind::NoMatchingBranch));
    }

    fn union_of(schema: &Schema) -> &UnionSchema {
        match schema.kind() {
            SchemaKind::Union(union) => union,
            _ => panic!("not a union"),
        }
    }
}
