use datum::error::{LengthError, MismatchKind};
use datum::prelude::*;
use proptest::prelude::*;

fn sample_schema() -> Schema {
    Schema::record(
        Name::new("org.sample.Reading"),
        vec![
            Field::new("sensor", Schema::string()),
            Field::new("channel", Schema::int()),
            Field::new("samples", Schema::array(Schema::long())),
            Field::new("gain", Schema::double()),
            Field::new("label", Schema::union(vec![Schema::null(), Schema::string()]).unwrap()),
        ],
    )
}

const FIELDS: [&str; 5] = ["sensor", "channel", "samples", "gain", "label"];

fn reading() -> impl Strategy<Value = Vec<Value>> {
    (
        "[a-z]{0,12}",
        any::<i32>(),
        prop::collection::vec(any::<i64>(), 0..16),
        -1.0e12f64..1.0e12f64,
        prop::option::of("[ -~]{0,8}"),
    )
        .prop_map(|(sensor, channel, samples, gain, label)| {
            vec![
                Value::from(sensor),
                Value::Int(channel),
                Value::Array(samples.into_iter().map(Value::Long).collect()),
                Value::Double(gain),
                Value::from(label),
            ]
        })
}

fn named(items: &[Value]) -> Value {
    Value::record(FIELDS.iter().copied().zip(items.iter().cloned()))
}

proptest! {
    #[test]
    fn written_records_read_back(items in reading()) {
        let schema = sample_schema();
        let value = named(&items);
        let bytes = DatumWriter::default().to_bytes(&schema, &value).unwrap();
        let back = DatumReader::default().from_slice(&schema, &bytes).unwrap();
        prop_assert_eq!(back, value);
    }

    #[test]
    fn positional_and_named_agree(items in reading()) {
        let schema = sample_schema();
        let writer = DatumWriter::default();
        let positional = writer.to_bytes(&schema, &Value::Array(items.clone())).unwrap();
        let keyed = writer.to_bytes(&schema, &named(&items)).unwrap();
        prop_assert_eq!(positional, keyed);
    }

    #[test]
    fn undeclared_keys_depend_on_mode(items in reading(), extra in "x[a-z]{0,6}") {
        let schema = sample_schema();
        let mut value = named(&items);
        if let Value::Map(entries) = &mut value {
            entries.insert(extra.clone(), Value::Null);
        }
        let checked = DatumWriter::default();
        let err = checked.to_bytes(&schema, &value).unwrap_err();
        prop_assert_eq!(err.mismatch_kind().cloned(), Some(MismatchKind::UndeclaredFields(vec![extra])));

        let unchecked = DatumWriter::default().with_mode(ValidationMode::Unchecked);
        prop_assert_eq!(
            unchecked.to_bytes(&schema, &value).unwrap(),
            checked.to_bytes(&schema, &named(&items)).unwrap()
        );
    }

    #[test]
    fn positional_arity_is_exact(items in reading(), grow in any::<bool>()) {
        let schema = sample_schema();
        let mut items = items;
        if grow {
            items.push(Value::Null);
        } else {
            items.pop();
        }
        let actual = items.len();
        let err = DatumWriter::default().to_bytes(&schema, &Value::Array(items)).unwrap_err();
        prop_assert_eq!(
            err.mismatch_kind().cloned(),
            Some(MismatchKind::Length(LengthError::WrongLength { exact: FIELDS.len(), actual }))
        );
    }

    #[test]
    fn bulk_ints_match_generic(xs in prop::collection::vec(any::<i32>(), 0..64)) {
        let schema = Schema::array(Schema::int());
        let writer = DatumWriter::default();
        let generic = Value::Array(xs.iter().copied().map(Value::Int).collect());
        let bulk = Value::NumericArray(NumericArray::Int(xs));
        prop_assert_eq!(writer.to_bytes(&schema, &bulk).unwrap(), writer.to_bytes(&schema, &generic).unwrap());
    }

    #[test]
    fn bulk_longs_match_generic(xs in prop::collection::vec(any::<i64>(), 0..64)) {
        let schema = Schema::array(Schema::long());
        let writer = DatumWriter::default();
        let generic = Value::Array(xs.iter().copied().map(Value::Long).collect());
        let bulk = Value::NumericArray(NumericArray::Long(xs));
        prop_assert_eq!(writer.to_bytes(&schema, &bulk).unwrap(), writer.to_bytes(&schema, &generic).unwrap());
    }

    #[test]
    fn bulk_floats_match_generic(xs in prop::collection::vec(any::<f32>(), 0..64)) {
        let schema = Schema::array(Schema::float());
        let writer = DatumWriter::default();
        let generic = Value::Array(xs.iter().copied().map(Value::Float).collect());
        let bulk = Value::NumericArray(NumericArray::Float(xs));
        prop_assert_eq!(writer.to_bytes(&schema, &bulk).unwrap(), writer.to_bytes(&schema, &generic).unwrap());
    }

    #[test]
    fn bulk_doubles_match_generic(xs in prop::collection::vec(any::<f64>(), 0..64)) {
        let schema = Schema::array(Schema::double());
        let writer = DatumWriter::default();
        let generic = Value::Array(xs.iter().copied().map(Value::Double).collect());
        let bulk = Value::NumericArray(NumericArray::Double(xs));
        prop_assert_eq!(writer.to_bytes(&schema, &bulk).unwrap(), writer.to_bytes(&schema, &generic).unwrap());
    }

    #[test]
    fn bulk_booleans_match_generic(xs in prop::collection::vec(any::<bool>(), 0..64)) {
        let schema = Schema::array(Schema::boolean());
        let writer = DatumWriter::default();
        let generic = Value::Array(xs.iter().copied().map(Value::Boolean).collect());
        let bulk = Value::NumericArray(NumericArray::Boolean(xs));
        prop_assert_eq!(writer.to_bytes(&schema, &bulk).unwrap(), writer.to_bytes(&schema, &generic).unwrap());
    }

    #[test]
    fn enum_symbols_read_back(symbols in prop::collection::btree_set("[A-Z]{1,6}", 1..8), stranger in "[a-z]{1,6}") {
        let schema = Schema::enumeration("Label", symbols.iter().cloned()).unwrap();
        let writer = DatumWriter::default();
        let reader = DatumReader::default();
        for symbol in &symbols {
            let bytes = writer.to_bytes(&schema, &Value::symbol(symbol.as_str())).unwrap();
            prop_assert_eq!(reader.from_slice(&schema, &bytes).unwrap(), Value::symbol(symbol.as_str()));
        }
        let err = writer.to_bytes(&schema, &Value::symbol(stranger.as_str())).unwrap_err();
        prop_assert_eq!(err.mismatch_kind().cloned(), Some(MismatchKind::UnknownSymbol(stranger)));
    }

    #[test]
    fn longs_read_back(n in any::<i64>()) {
        let bytes = DatumWriter::default().to_bytes(&Schema::long(), &Value::Long(n)).unwrap();
        prop_assert!(bytes.len() <= 10);
        prop_assert_eq!(DatumReader::default().from_slice(&Schema::long(), &bytes).unwrap(), Value::Long(n));
    }
}
