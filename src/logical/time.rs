use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Timelike};
use num_integer::Integer;

use super::{unsupported_base, Conversion};
use crate::error::ConversionError;
use crate::schema::{Schema, SchemaKind};
use crate::value::Value;

/// Days from 0001-01-01 (day 1 of the common era) to 1970-01-01
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Resolution of a time or timestamp on the wire
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Precision {
    Millis,
    Micros,
}

impl Precision {
    const fn per_second(self) -> i64 {
        match self {
            Precision::Millis => 1_000,
            Precision::Micros => 1_000_000,
        }
    }

    const fn nanos_per_unit(self) -> i64 {
        1_000_000_000 / self.per_second()
    }
}

fn integral(value: &Value) -> Option<i64> {
    match value {
        Value::Int(n) => Some(i64::from(*n)),
        Value::Long(n) => Some(*n),
        _ => None,
    }
}

/// `date`: an `int` counting days since 1970-01-01
#[derive(Clone, Copy, Debug, Default)]
pub struct DateConversion;

impl Conversion for DateConversion {
    fn to_wire(&self, value: &Value, schema: &Schema) -> Result<Value, ConversionError> {
        match value {
            Value::Date(date) if matches!(schema.kind(), SchemaKind::Int) => {
                Ok(Value::Int(date.num_days_from_ce() - EPOCH_DAYS_FROM_CE))
            }
            Value::Date(_) => Err(unsupported_base("date", schema)),
            other => Ok(other.clone()),
        }
    }

    fn from_wire(&self, value: Value, _schema: &Schema) -> Result<Value, ConversionError> {
        let Value::Int(days) = value else {
            return Ok(value);
        };
        days.checked_add(EPOCH_DAYS_FROM_CE)
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .map(Value::Date)
            .ok_or_else(|| ConversionError::msg(format!("{days} days from epoch is not a valid date")))
    }

    fn recognizes(&self, value: &Value) -> bool {
        matches!(value, Value::Date(_))
    }
}

/// `time-millis` (`int`) and `time-micros` (`long`): time elapsed since midnight
#[derive(Clone, Copy, Debug)]
pub struct TimeConversion {
    precision: Precision,
}

impl TimeConversion {
    pub const fn new(precision: Precision) -> Self {
        Self { precision }
    }
}

impl Conversion for TimeConversion {
    fn to_wire(&self, value: &Value, schema: &Schema) -> Result<Value, ConversionError> {
        let Value::Time(time) = value else {
            return Ok(value.clone());
        };
        let units = i64::from(time.num_seconds_from_midnight()) * self.precision.per_second()
            + i64::from(time.nanosecond()) / self.precision.nanos_per_unit();
        match (self.precision, schema.kind()) {
            (Precision::Millis, SchemaKind::Int) => i32::try_from(units)
                .map(Value::Int)
                .map_err(ConversionError::new),
            (Precision::Micros, SchemaKind::Long) => Ok(Value::Long(units)),
            _ => Err(unsupported_base("time", schema)),
        }
    }

    fn from_wire(&self, value: Value, _schema: &Schema) -> Result<Value, ConversionError> {
        let Some(units) = integral(&value) else {
            return Ok(value);
        };
        let (secs, rem) = units.div_mod_floor(&self.precision.per_second());
        u32::try_from(secs)
            .ok()
            .and_then(|secs| {
                let nanos = u32::try_from(rem * self.precision.nanos_per_unit()).ok()?;
                NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos)
            })
            .map(Value::Time)
            .ok_or_else(|| ConversionError::msg(format!("{units} is not a valid time of day")))
    }

    fn recognizes(&self, value: &Value) -> bool {
        matches!(value, Value::Time(_))
    }
}

/// `timestamp-millis` and `timestamp-micros`: a `long` counting units since
/// 1970-01-01T00:00:00Z
#[derive(Clone, Copy, Debug)]
pub struct TimestampConversion {
    precision: Precision,
}

impl TimestampConversion {
    pub const fn new(precision: Precision) -> Self {
        Self { precision }
    }
}

impl Conversion for TimestampConversion {
    fn to_wire(&self, value: &Value, schema: &Schema) -> Result<Value, ConversionError> {
        let Value::Timestamp(ts) = value else {
            return Ok(value.clone());
        };
        if !matches!(schema.kind(), SchemaKind::Long) {
            return Err(unsupported_base("timestamp", schema));
        }
        match self.precision {
            Precision::Millis => Ok(Value::Long(ts.timestamp_millis())),
            Precision::Micros => Ok(Value::Long(ts.timestamp_micros())),
        }
    }

    fn from_wire(&self, value: Value, _schema: &Schema) -> Result<Value, ConversionError> {
        let Some(units) = integral(&value) else {
            return Ok(value);
        };
        let (secs, rem) = units.div_mod_floor(&self.precision.per_second());
        u32::try_from(rem * self.precision.nanos_per_unit())
            .ok()
            .and_then(|nanos| DateTime::from_timestamp(secs, nanos))
            .map(Value::Timestamp)
            .ok_or_else(|| ConversionError::msg(format!("{units} is out of range for a timestamp")))
    }

    fn recognizes(&self, value: &Value) -> bool {
        matches!(value, Value::Timestamp(_))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn dates_count_from_epoch() {
        let conv = DateConversion;
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(conv.to_wire(&Value::Date(epoch), &Schema::int()).unwrap(), Value::Int(0));
        let before = NaiveDate::from_ymd_opt(1969, 12, 31).unwrap();
        assert_eq!(conv.to_wire(&Value::Date(before), &Schema::int()).unwrap(), Value::Int(-1));
        assert_eq!(conv.from_wire(Value::Int(31), &Schema::int()).unwrap(), Value::Date(NaiveDate::from_ymd_opt(1970, 2, 1).unwrap()));
        assert_eq!(conv.to_wire(&Value::Int(5), &Schema::int()).unwrap(), Value::Int(5));
    }

    #[test]
    fn times_of_day() {
        let t = NaiveTime::from_hms_micro_opt(1, 2, 3, 456_789).unwrap();
        let millis = TimeConversion::new(Precision::Millis);
        let micros = TimeConversion::new(Precision::Micros);
        assert_eq!(millis.to_wire(&Value::Time(t), &Schema::int()).unwrap(), Value::Int(3_723_456));
        assert_eq!(micros.to_wire(&Value::Time(t), &Schema::long()).unwrap(), Value::Long(3_723_456_789));
        assert_eq!(micros.from_wire(Value::Long(3_723_456_789), &Schema::long()).unwrap(), Value::Time(t));
        assert!(millis.from_wire(Value::Int(-1), &Schema::int()).is_err());
        assert!(millis.to_wire(&Value::Time(t), &Schema::long()).is_err());
    }

    #[test]
    fn timestamps_before_epoch() {
        let conv = TimestampConversion::new(Precision::Millis);
        let ts = Utc.with_ymd_and_hms(1969, 12, 31, 23, 59, 59).unwrap() + chrono::Duration::milliseconds(500);
        let wire = conv.to_wire(&Value::Timestamp(ts), &Schema::long()).unwrap();
        assert_eq!(wire, Value::Long(-500));
        assert_eq!(conv.from_wire(wire, &Schema::long()).unwrap(), Value::Timestamp(ts));
    }

    #[test]
    fn micro_timestamps() {
        let conv = TimestampConversion::new(Precision::Micros);
        let ts = Utc.with_ymd_and_hms(2001, 9, 9, 1, 46, 40).unwrap();
        let wire = conv.to_wire(&Value::Timestamp(ts), &Schema::long()).unwrap();
        assert_eq!(wire, Value::Long(1_000_000_000_000_000));
        assert_eq!(conv.from_wire(wire, &Schema::long()).unwrap(), Value::Timestamp(ts));
    }
}
