//! Encode-side error types
//!
//! This module contains the errors that may be returned while mapping a
//! [`Value`](crate::value::Value) onto a [`Schema`](crate::schema::Schema),
//! as well as the narrower error types they are built from.
//!
//! Decode-side errors live in [`parse::error`](crate::parse::error), as they
//! are produced almost exclusively by [`Parser`](crate::parse::Parser) and
//! [`Decoder`](crate::parse::Decoder) methods.
//!
//! # Layout
//!
//! * [`EncodeError`] is the top-level error returned by every write operation.
//! * [`MismatchKind`] enumerates the ways a value can fail to fit a schema node.
//! * [`WidthError`] and [`LengthError`] refine `MismatchKind` for the two checks
//!   that compare a count against a schema-declared constant.
//! * [`ConversionError`] is the opaque error a logical-type conversion may return.

use std::fmt::Display;

use crate::util::hex_of_bytes;
use crate::value::Value;

/// Enumerated error type for failures related to schema constructs
/// that impose a check on the byte-width on their prospective values.
///
/// Structurally similar to [`LengthError`], an analoguous error-type
/// relating to the number of elements in a collection-type, rather than
/// the number of bytes in an opaque schema type.
#[derive(Clone, PartialEq, PartialOrd, Eq, Ord, Debug, thiserror::Error)]
pub enum WidthError {
    /// Requirement of precise byte-width not satisfied
    #[error("{actual}-byte value violated requirement of {exact} bytes")]
    WrongWidth { exact: usize, actual: usize },
}

/// Enumerated error type for failures related to schema constructs
/// that impose a check on the element-count of their prospective
/// values.
///
/// The only such construct is a record written in positional mode, whose
/// element count must match the number of declared fields.
#[derive(Clone, PartialEq, PartialOrd, Eq, Ord, Debug, thiserror::Error)]
pub enum LengthError {
    /// Requirement of precise element-count not satisfied
    #[error("{actual}-element value violated requirement of {exact} elements")]
    WrongLength { exact: usize, actual: usize },
}

/// Reason a value was rejected by the schema node it was written against.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum MismatchKind {
    /// Non-null value written against a `null` schema
    #[error("expected null")]
    NotNull,
    /// Value of the wrong shape for the schema node
    #[error("expected {expected}")]
    WrongType { expected: &'static str },
    /// Numeric value that cannot be represented at the wire width
    #[error("value out of range for {target}")]
    OutOfRange { target: &'static str },
    /// Byte content of the wrong size for a `fixed` schema
    #[error(transparent)]
    Width(#[from] WidthError),
    /// Positional record of the wrong arity
    #[error(transparent)]
    Length(#[from] LengthError),
    /// Enum symbol absent from the declared symbol list
    #[error("symbol `{0}` is not declared")]
    UnknownSymbol(String),
    /// Keys of a checked named record that are not declared fields
    #[error("undeclared fields {0:?}")]
    UndeclaredFields(Vec<String>),
    /// No branch of a union accepts the value
    #[error("no union branch accepts the value")]
    NoMatchingBranch,
}

/// Opaque error produced by a logical-type conversion function.
///
/// The registrant's error is carried unchanged, and both its `Display`
/// and `source` pass straight through.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ConversionError(Box<dyn std::error::Error + Send + Sync + 'static>);

impl ConversionError {
    /// Wraps an arbitrary error returned by a conversion function
    pub fn new<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self(err.into())
    }

    /// Constructs a `ConversionError` from a message alone
    pub fn msg(msg: impl Display) -> Self {
        Self(msg.to_string().into())
    }

    /// Returns a reference to the error originally returned by the conversion
    pub fn inner(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.0.as_ref()
    }
}

/// Any error that may be encountered while writing a value
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// The runtime shape of a value is incompatible with its schema node
    #[error("{value} does not match schema {schema}: {kind}")]
    Mismatch {
        schema: String,
        value: String,
        kind: MismatchKind,
    },
    /// A null value reached a schema node that cannot hold one.
    ///
    /// The message grows as the error propagates outward, and reads
    /// like `null of int in field age of com.example.Person`.
    #[error("{0}")]
    Null(String),
    /// A registered logical-type conversion failed
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// Type alias for Result with an error type of [`EncodeError`]
pub type EncodeResult<T> = std::result::Result<T, EncodeError>;

/// Upper bound on the number of characters of a value rendered into an error
const RENDER_LIMIT: usize = 96;

fn render(value: &Value) -> String {
    let mut s = match value.as_byte_slice() {
        Some(bytes) => format!("{} 0x{}", value.shape(), hex_of_bytes(bytes)),
        None => format!("{value:?}"),
    };
    if s.len() > RENDER_LIMIT {
        let mut cut = RENDER_LIMIT;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        s.truncate(cut);
        s.push_str("...");
    }
    s
}

impl EncodeError {
    /// Constructs a [`EncodeError::Mismatch`] for `value` against the schema named `schema`
    pub fn mismatch(schema: impl Into<String>, value: &Value, kind: impl Into<MismatchKind>) -> Self {
        Self::Mismatch {
            schema: schema.into(),
            value: render(value),
            kind: kind.into(),
        }
    }

    /// Constructs the innermost null-dereference error for a schema of the given full name
    pub fn null_of(schema: impl Display) -> Self {
        Self::Null(format!("null of {schema}"))
    }

    /// Appends positional context to a null-dereference error, leaving every
    /// other variant untouched.
    #[must_use]
    pub fn annotate_null(self, context: impl Display) -> Self {
        match self {
            Self::Null(mut msg) => {
                msg.push(' ');
                msg.push_str(&context.to_string());
                Self::Null(msg)
            }
            other => other,
        }
    }

    /// Returns the [`MismatchKind`] of a schema mismatch, if this is one
    pub fn mismatch_kind(&self) -> Option<&MismatchKind> {
        match self {
            Self::Mismatch { kind, .. } => Some(kind),
            _ => None,
        }
    }

    /// Returns `true` if this error reports a schema mismatch
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::Mismatch { .. })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn dummy<T: Send + Sync>() {}

    #[test]
    fn encode_error_threadsafe() {
        dummy::<EncodeError>()
    }

    #[test]
    fn null_trail() {
        let err = EncodeError::null_of("int")
            .annotate_null("in field age")
            .annotate_null("of com.example.Person");
        assert_eq!(err.to_string(), "null of int in field age of com.example.Person");
    }

    #[test]
    fn annotate_ignores_mismatch() {
        let err = EncodeError::mismatch("int", &Value::from("x"), MismatchKind::WrongType { expected: "number" })
            .annotate_null("in field age");
        assert!(err.is_mismatch());
        assert!(!err.to_string().contains("in field"));
    }

    #[test]
    fn long_values_are_truncated() {
        let err = EncodeError::mismatch("int", &Value::String("x".repeat(500)), MismatchKind::NotNull);
        match err {
            EncodeError::Mismatch { value, .. } => assert!(value.len() <= RENDER_LIMIT + 3),
            _ => unreachable!(),
        }
    }

    #[test]
    fn bytes_rendered_as_hex() {
        let err = EncodeError::mismatch("MD5", &Value::Bytes(vec![0xca, 0xfe]), MismatchKind::NotNull);
        assert_eq!(err.to_string(), "bytes 0xcafe does not match schema MD5: expected null");
    }

    #[test]
    fn width_message() {
        let kind: MismatchKind = WidthError::WrongWidth { exact: 16, actual: 4 }.into();
        assert_eq!(kind.to_string(), "4-byte value violated requirement of 16 bytes");
    }
}
