//! Numeric casts from native values to wire widths
//!
//! Integral wire types accept integral values that fit, and finite floating
//! values whose truncation toward zero fits. Floating wire types accept any
//! numeric value; `float` rejects finite doubles beyond its range, while
//! infinities and NaN carry over.

use crate::error::MismatchKind;
use crate::value::Value;

const NOT_A_NUMBER: MismatchKind = MismatchKind::WrongType { expected: "number" };

// 2^63, the first double past the end of the i64 range
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn out_of_range(target: &'static str) -> MismatchKind {
    MismatchKind::OutOfRange { target }
}

fn truncate_to_int(x: f64) -> Result<i32, MismatchKind> {
    let t = x.trunc();
    if x.is_finite() && t >= f64::from(i32::MIN) && t <= f64::from(i32::MAX) {
        Ok(t as i32)
    } else {
        Err(out_of_range("int"))
    }
}

fn truncate_to_long(x: f64) -> Result<i64, MismatchKind> {
    let t = x.trunc();
    if x.is_finite() && t >= -I64_BOUND && t < I64_BOUND {
        Ok(t as i64)
    } else {
        Err(out_of_range("long"))
    }
}

pub(crate) fn to_int(value: &Value) -> Result<i32, MismatchKind> {
    match *value {
        Value::Int(n) => Ok(n),
        Value::Long(n) => i32::try_from(n).map_err(|_| out_of_range("int")),
        Value::Float(x) => truncate_to_int(f64::from(x)),
        Value::Double(x) => truncate_to_int(x),
        _ => Err(NOT_A_NUMBER),
    }
}

pub(crate) fn to_long(value: &Value) -> Result<i64, MismatchKind> {
    match *value {
        Value::Int(n) => Ok(i64::from(n)),
        Value::Long(n) => Ok(n),
        Value::Float(x) => truncate_to_long(f64::from(x)),
        Value::Double(x) => truncate_to_long(x),
        _ => Err(NOT_A_NUMBER),
    }
}

pub(crate) fn to_float(value: &Value) -> Result<f32, MismatchKind> {
    match *value {
        Value::Int(n) => Ok(n as f32),
        Value::Long(n) => Ok(n as f32),
        Value::Float(x) => Ok(x),
        Value::Double(x) if x.is_finite() && x.abs() > f64::from(f32::MAX) => {
            Err(out_of_range("float"))
        }
        Value::Double(x) => Ok(x as f32),
        _ => Err(NOT_A_NUMBER),
    }
}

pub(crate) fn to_double(value: &Value) -> Result<f64, MismatchKind> {
    match *value {
        Value::Int(n) => Ok(f64::from(n)),
        Value::Long(n) => Ok(n as f64),
        Value::Float(x) => Ok(f64::from(x)),
        Value::Double(x) => Ok(x),
        _ => Err(NOT_A_NUMBER),
    }
}

pub(crate) fn to_boolean(value: &Value) -> Result<bool, MismatchKind> {
    match *value {
        Value::Boolean(b) => Ok(b),
        _ => Err(MismatchKind::WrongType { expected: "boolean" }),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn int_narrowing() {
        assert_eq!(to_int(&Value::Long(-7)), Ok(-7));
        assert_eq!(to_int(&Value::Long(1 << 31)), Err(out_of_range("int")));
        assert_eq!(to_int(&Value::Double(-2.9)), Ok(-2));
        assert_eq!(to_int(&Value::Double(f64::NAN)), Err(out_of_range("int")));
        assert_eq!(to_int(&Value::Double(2_147_483_647.5)), Ok(i32::MAX));
        assert_eq!(to_int(&Value::from("3")), Err(NOT_A_NUMBER));
    }

    #[test]
    fn long_bounds() {
        assert_eq!(to_long(&Value::Double(-9.223_372_036_854_775_808e18)), Ok(i64::MIN));
        assert_eq!(to_long(&Value::Double(9.223_372_036_854_775_808e18)), Err(out_of_range("long")));
        assert_eq!(to_long(&Value::Float(1.5)), Ok(1));
    }

    #[test]
    fn float_range() {
        assert_eq!(to_float(&Value::Double(1e39)), Err(out_of_range("float")));
        assert_eq!(to_float(&Value::Double(f64::INFINITY)), Ok(f32::INFINITY));
        assert_eq!(to_float(&Value::Int(3)), Ok(3.0));
        assert_eq!(to_double(&Value::Float(0.5)), Ok(0.5));
        assert_eq!(to_boolean(&Value::Int(1)), Err(MismatchKind::WrongType { expected: "boolean" }));
    }
}
