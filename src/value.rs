//! Dynamic value model
//!
//! A [`Value`] is the datum handed to the dispatcher for writing, and the datum
//! it hands back after reading. It is deliberately open-ended: the same schema
//! node may accept several value shapes (a record may be written from an
//! ordered [`Value::Array`] or a keyed [`Value::Map`], `bytes` from an owned
//! buffer or a [`ByteWindow`], an array from a generic sequence or a
//! [`NumericArray`]), and the dispatcher matches on both the schema node and
//! the value to decide how to proceed.
//!
//! # Equality
//!
//! `PartialEq` on `Value` is *structural*: the two byte representations compare
//! equal when their visible bytes agree, a `NumericArray` compares equal to an
//! `Array` holding the corresponding scalars, and [`Value::Annotated`] wrappers
//! are transparent. Scalars of different widths (`Int(1)` and `Long(1)`) are
//! not equal.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use num_bigint::BigInt;

use crate::bytelike::{ByteLike, ByteWindow};

/// Whether keyed record writes must supply exactly the declared field set
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde_impls", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde_impls", serde(rename_all = "lowercase"))]
pub enum ValidationMode {
    /// Undeclared keys in a named record value fail the write
    #[default]
    Checked,
    /// Undeclared keys are ignored
    Unchecked,
}

impl ValidationMode {
    /// Returns the mode corresponding to a `strict-fields` flag
    pub const fn from_strict(strict_fields: bool) -> Self {
        if strict_fields {
            Self::Checked
        } else {
            Self::Unchecked
        }
    }

    pub const fn is_checked(self) -> bool {
        matches!(self, Self::Checked)
    }
}

/// Arbitrary-precision decimal: an unscaled integer and a base-10 scale
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decimal {
    unscaled: BigInt,
    scale: u32,
}

impl Decimal {
    pub fn new(unscaled: impl Into<BigInt>, scale: u32) -> Self {
        Self {
            unscaled: unscaled.into(),
            scale,
        }
    }

    pub fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }
}

impl Display for Decimal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let digits = self.unscaled.magnitude().to_string();
        let sign = if self.unscaled.sign() == num_bigint::Sign::Minus {
            "-"
        } else {
            ""
        };
        let scale = self.scale as usize;
        if scale == 0 {
            return write!(f, "{sign}{digits}");
        }
        let padded = if digits.len() <= scale {
            format!("{}{digits}", "0".repeat(scale + 1 - digits.len()))
        } else {
            digits
        };
        let (int, frac) = padded.split_at(padded.len() - scale);
        write!(f, "{sign}{int}.{frac}")
    }
}

/// Homogeneous array of fixed-width native scalars
///
/// Arrays in this form are eligible for the bulk encoding path, which writes
/// all elements without dispatching on each one.
#[derive(Clone, Debug, PartialEq)]
pub enum NumericArray {
    Int(Vec<i32>),
    Long(Vec<i64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    Boolean(Vec<bool>),
}

impl NumericArray {
    pub fn len(&self) -> usize {
        match self {
            NumericArray::Int(v) => v.len(),
            NumericArray::Long(v) => v.len(),
            NumericArray::Float(v) => v.len(),
            NumericArray::Double(v) => v.len(),
            NumericArray::Boolean(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the element at `ix` as a scalar [`Value`]
    pub fn get(&self, ix: usize) -> Option<Value> {
        match self {
            NumericArray::Int(v) => v.get(ix).copied().map(Value::Int),
            NumericArray::Long(v) => v.get(ix).copied().map(Value::Long),
            NumericArray::Float(v) => v.get(ix).copied().map(Value::Float),
            NumericArray::Double(v) => v.get(ix).copied().map(Value::Double),
            NumericArray::Boolean(v) => v.get(ix).copied().map(Value::Boolean),
        }
    }

    /// Iterates over the elements as scalar [`Value`]s
    pub fn values(&self) -> impl Iterator<Item = Value> + '_ {
        (0..self.len()).filter_map(move |ix| self.get(ix))
    }
}

/// Dynamically-typed datum
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Boolean(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    /// Owned contiguous byte buffer
    Bytes(Vec<u8>),
    /// Windowed view into a shared byte buffer
    ByteView(ByteWindow),
    String(String),
    /// Symbolic name, as used for enum values
    Symbol(String),
    /// Ordered sequence: an array, or a record in positional form
    Array(Vec<Value>),
    /// Homogeneous native scalar array
    NumericArray(NumericArray),
    /// Keyed mapping: a map, or a record in named form
    Map(BTreeMap<String, Value>),
    /// Value carrying a validation-mode override for its whole subtree
    Annotated(ValidationMode, Box<Value>),
    Uuid(uuid::Uuid),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(DateTime<Utc>),
    Decimal(Decimal),
}

impl Value {
    /// Wraps `value` with a validation-mode override
    pub fn annotated(mode: ValidationMode, value: Value) -> Self {
        Self::Annotated(mode, Box::new(value))
    }

    /// Builds a keyed mapping from `(key, value)` pairs
    pub fn record<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Builds a symbolic name
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    /// Strips any number of [`Value::Annotated`] wrappers
    pub fn unannotated(&self) -> &Value {
        let mut cur = self;
        while let Value::Annotated(_, inner) = cur {
            cur = inner;
        }
        cur
    }

    pub fn is_null(&self) -> bool {
        matches!(self.unannotated(), Value::Null)
    }

    /// Returns a uniform byte view of either byte representation
    pub fn byte_like(&self) -> Option<&dyn ByteLike> {
        match self {
            Value::Bytes(buf) => Some(buf as &dyn ByteLike),
            Value::ByteView(win) => Some(win as &dyn ByteLike),
            _ => None,
        }
    }

    /// Returns the visible bytes of either byte representation
    pub fn as_byte_slice(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(buf) => Some(buf.as_slice()),
            Value::ByteView(win) => Some(win.as_slice()),
            _ => None,
        }
    }

    /// Returns the name of a symbol or the contents of a string
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Value::Symbol(s) | Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Short description of the shape of the value, for diagnostics
    pub fn shape(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Bytes(_) => "bytes",
            Value::ByteView(_) => "byte view",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Array(_) => "array",
            Value::NumericArray(_) => "numeric array",
            Value::Map(_) => "map",
            Value::Annotated(_, inner) => inner.shape(),
            Value::Uuid(_) => "uuid",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::Timestamp(_) => "timestamp",
            Value::Decimal(_) => "decimal",
        }
    }
}

fn seq_eq(items: &[Value], numeric: &NumericArray) -> bool {
    items.len() == numeric.len() && items.iter().zip(numeric.values()).all(|(a, b)| *a == b)
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Annotated(_, a), b) => a.as_ref() == b,
            (a, Annotated(_, b)) => a == b.as_ref(),
            (Null, Null) => true,
            (Boolean(a), Boolean(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Long(a), Long(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Double(a), Double(b)) => a == b,
            (Bytes(_) | ByteView(_), Bytes(_) | ByteView(_)) => {
                self.as_byte_slice() == other.as_byte_slice()
            }
            (String(a), String(b)) => a == b,
            (Symbol(a), Symbol(b)) => a == b,
            (Array(a), Array(b)) => a == b,
            (NumericArray(a), NumericArray(b)) => a == b,
            (Array(a), NumericArray(b)) | (NumericArray(b), Array(a)) => seq_eq(a, b),
            (Map(a), Map(b)) => a == b,
            (Uuid(a), Uuid(b)) => a == b,
            (Date(a), Date(b)) => a == b,
            (Time(a), Time(b)) => a == b,
            (Timestamp(a), Timestamp(b)) => a == b,
            (Decimal(a), Decimal(b)) => a == b,
            _ => false,
        }
    }
}

macro_rules! value_from {
    ( $( $src:ty => $var:ident ),+ $(,)? ) => {
        $(
            impl From<$src> for Value {
                #[inline]
                fn from(val: $src) -> Self {
                    Value::$var(val.into())
                }
            }
        )+
    };
}

value_from! {
    bool => Boolean,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    Vec<u8> => Bytes,
    ByteWindow => ByteView,
    String => String,
    &str => String,
    Vec<Value> => Array,
    NumericArray => NumericArray,
    BTreeMap<String, Value> => Map,
    uuid::Uuid => Uuid,
    NaiveDate => Date,
    NaiveTime => Time,
    DateTime<Utc> => Timestamp,
    Decimal => Decimal,
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(val: Option<T>) -> Self {
        val.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn byte_representations_compare_by_content() {
        let owned = Value::Bytes(vec![1, 2, 3]);
        let view = Value::ByteView(ByteWindow::with_bounds(vec![0, 1, 2, 3], 1, 4).unwrap());
        assert_eq!(owned, view);
        assert_ne!(owned, Value::Bytes(vec![1, 2]));
    }

    #[test]
    fn numeric_arrays_compare_with_sequences() {
        let bulk = Value::NumericArray(NumericArray::Long(vec![1, 2, 3]));
        let generic = Value::Array(vec![Value::Long(1), Value::Long(2), Value::Long(3)]);
        assert_eq!(bulk, generic);
        assert_eq!(generic, bulk);
        assert_ne!(bulk, Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)]));
    }

    #[test]
    fn annotations_are_transparent() {
        let v = Value::annotated(ValidationMode::Unchecked, Value::Int(4));
        assert_eq!(v, Value::Int(4));
        assert!(Value::annotated(ValidationMode::Checked, Value::Null).is_null());
    }

    #[test]
    fn decimal_display() {
        assert_eq!(Decimal::new(12345, 2).to_string(), "123.45");
        assert_eq!(Decimal::new(-5, 3).to_string(), "-0.005");
        assert_eq!(Decimal::new(42, 0).to_string(), "42");
    }

    #[test]
    fn options_become_null() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some(3i64)), Value::Long(3));
    }
}
