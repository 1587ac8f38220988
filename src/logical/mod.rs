//! Logical-type conversions
//!
//! A schema node may carry a [`LogicalType`](crate::schema::LogicalType)
//! annotation, which leaves its wire shape unchanged but names a conversion
//! between some native value (a UUID, a calendar date, a decimal) and a value
//! of the node's base type. Conversions are looked up by identifier in a
//! [`LogicalTypeRegistry`] owned by the caller and handed to the dispatcher.
//!
//! An identifier with no registered conversion is not an error: the node is
//! simply written and read as its base type.
//!
//! # Standard conversions
//!
//! [`LogicalTypeRegistry::with_standard_conversions`] (and the shared instance
//! returned by [`LogicalTypeRegistry::standard`]) carries conversions for
//! `uuid`, `date`, `time-millis`, `time-micros`, `timestamp-millis`,
//! `timestamp-micros` and `decimal`. Each of them passes a value that is
//! already in base form through unchanged, so that callers may write either
//! representation.

mod decimal;
mod time;
mod uuid;

use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use lazy_static::lazy_static;

use crate::error::ConversionError;
use crate::schema::Schema;
use crate::value::Value;

pub use self::decimal::DecimalConversion;
pub use self::time::{DateConversion, Precision, TimeConversion, TimestampConversion};
pub use self::uuid::UuidConversion;

/// Pair of functions translating between native values and base-type values
pub trait Conversion: Send + Sync {
    /// Converts a native value into a value of the schema node's base type
    fn to_wire(&self, value: &Value, schema: &Schema) -> Result<Value, ConversionError>;

    /// Converts a decoded base-type value into its native form
    fn from_wire(&self, value: Value, schema: &Schema) -> Result<Value, ConversionError>;

    /// Returns `true` if `value` is a native value of this conversion.
    ///
    /// Used during union branch selection, where a branch carrying this
    /// conversion accepts any value it recognizes in addition to values of
    /// its base shape.
    fn recognizes(&self, _value: &Value) -> bool {
        false
    }
}

type ToWireFn = dyn Fn(&Value, &Schema) -> Result<Value, ConversionError> + Send + Sync;
type FromWireFn = dyn Fn(Value, &Schema) -> Result<Value, ConversionError> + Send + Sync;

/// [`Conversion`] assembled from a pair of closures
struct FnConversion {
    to: Box<ToWireFn>,
    from: Box<FromWireFn>,
}

impl Conversion for FnConversion {
    fn to_wire(&self, value: &Value, schema: &Schema) -> Result<Value, ConversionError> {
        (self.to)(value, schema)
    }

    fn from_wire(&self, value: Value, schema: &Schema) -> Result<Value, ConversionError> {
        (self.from)(value, schema)
    }
}

/// Mapping from logical-type identifier to [`Conversion`]
#[derive(Clone, Default)]
pub struct LogicalTypeRegistry {
    conversions: HashMap<String, Arc<dyn Conversion>>,
}

lazy_static! {
    static ref STANDARD: LogicalTypeRegistry = LogicalTypeRegistry::with_standard_conversions();
    static ref EMPTY: LogicalTypeRegistry = LogicalTypeRegistry::new();
}

impl LogicalTypeRegistry {
    /// Creates a registry with no conversions
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every standard conversion
    #[must_use]
    pub fn with_standard_conversions() -> Self {
        let mut reg = Self::new();
        reg.register_conversion("uuid", UuidConversion);
        reg.register_conversion("date", DateConversion);
        reg.register_conversion("time-millis", TimeConversion::new(Precision::Millis));
        reg.register_conversion("time-micros", TimeConversion::new(Precision::Micros));
        reg.register_conversion("timestamp-millis", TimestampConversion::new(Precision::Millis));
        reg.register_conversion("timestamp-micros", TimestampConversion::new(Precision::Micros));
        reg.register_conversion("decimal", DecimalConversion);
        reg
    }

    /// Returns a process-wide registry holding every standard conversion
    pub fn standard() -> &'static LogicalTypeRegistry {
        &STANDARD
    }

    /// Returns a process-wide registry with no conversions
    pub fn empty() -> &'static LogicalTypeRegistry {
        &EMPTY
    }

    /// Registers a conversion built from a `to_wire` and a `from_wire` closure.
    ///
    /// Replaces any conversion previously registered for `identifier`.
    pub fn register<T, F>(&mut self, identifier: impl Into<String>, to_wire: T, from_wire: F)
    where
        T: Fn(&Value, &Schema) -> Result<Value, ConversionError> + Send + Sync + 'static,
        F: Fn(Value, &Schema) -> Result<Value, ConversionError> + Send + Sync + 'static,
    {
        self.register_conversion(
            identifier,
            FnConversion {
                to: Box::new(to_wire),
                from: Box::new(from_wire),
            },
        )
    }

    /// Registers `conversion` for `identifier`, replacing any earlier registration
    pub fn register_conversion(
        &mut self,
        identifier: impl Into<String>,
        conversion: impl Conversion + 'static,
    ) {
        let identifier = identifier.into();
        let replaced = self
            .conversions
            .insert(identifier.clone(), Arc::new(conversion))
            .is_some();
        tracing::debug!(%identifier, replaced, "registered logical type conversion");
    }

    pub fn lookup(&self, identifier: &str) -> Option<&dyn Conversion> {
        self.conversions.get(identifier).map(|conv| &**conv)
    }

    /// Returns the conversion registered for the logical type of `schema`, if any
    pub fn conversion_for(&self, schema: &Schema) -> Option<&dyn Conversion> {
        schema
            .logical_type()
            .and_then(|logical| self.lookup(logical.name()))
    }

    /// Iterates over the registered identifiers, in no particular order
    pub fn identifiers(&self) -> impl Iterator<Item = &str> + '_ {
        self.conversions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.conversions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversions.is_empty()
    }
}

impl Debug for LogicalTypeRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<&str> = self.identifiers().collect();
        ids.sort_unstable();
        f.debug_struct("LogicalTypeRegistry")
            .field("identifiers", &ids)
            .finish()
    }
}

/// Builds the error returned when a native value cannot be written against a schema node
pub(crate) fn unsupported_base(identifier: &str, schema: &Schema) -> ConversionError {
    ConversionError::msg(format!(
        "{identifier} values cannot be written as {}",
        schema.kind().type_name()
    ))
}

#[cfg(test)]
mod test {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn standard_identifiers() {
        let reg = LogicalTypeRegistry::standard();
        let mut ids: Vec<&str> = reg.identifiers().collect();
        ids.sort_unstable();
        assert_eq!(
            ids,
            [
                "date",
                "decimal",
                "time-micros",
                "time-millis",
                "timestamp-micros",
                "timestamp-millis",
                "uuid"
            ]
        );
        assert!(LogicalTypeRegistry::new().is_empty());
    }

    #[test]
    fn last_registration_wins() {
        let mut reg = LogicalTypeRegistry::new();
        reg.register("shout", |_, _| Ok(Value::from("first")), |v, _| Ok(v));
        reg.register("shout", |_, _| Ok(Value::from("second")), |v, _| Ok(v));
        assert_eq!(reg.len(), 1);
        let conv = reg.lookup("shout").unwrap();
        assert_eq!(
            conv.to_wire(&Value::Null, &Schema::string()).unwrap(),
            Value::from("second")
        );
    }

    #[traced_test]
    #[test]
    fn registration_is_logged() {
        let mut reg = LogicalTypeRegistry::new();
        reg.register_conversion("uuid", UuidConversion);
        reg.register_conversion("uuid", UuidConversion);
        assert!(logs_contain("registered logical type conversion"));
        assert!(logs_contain("replaced=true"));
    }
}
