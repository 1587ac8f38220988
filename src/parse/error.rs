//! Decode-side errors
//!
//! [`ParseError`] is what every [`Parser`](crate::parse::Parser) and
//! [`Decoder`](crate::parse::Decoder) method fails with. It splits by origin
//! into [`WindowError`] (bounds and size windows), [`TokenError`] (bytes that
//! do not form a legal token) and [`InternalError`]. [`DecodeError`] wraps it
//! for [`DatumReader`](crate::read::DatumReader), adding failures of
//! logical-type conversions and trailing input.

use std::array::TryFromSliceError;

use crate::error::ConversionError;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Window(#[from] WindowError),
    #[error(transparent)]
    Internal(#[from] InternalError),
    /// The buffer held bytes that are not a legal encoding of the token read
    #[error(transparent)]
    Token(#[from] TokenError),
}

pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Violations of the buffer end or of an open size window
///
/// A window is opened for each collection block that declares its byte-size,
/// and must be consumed exactly before the next block is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    /// Read past the end of the buffer or of the innermost window
    #[error("cannot increment offset by {requested} bytes (currently at byte {offset} out of limit {limit})")]
    ConsumeWouldExceedLimit {
        offset: usize,
        requested: usize,
        limit: usize,
    },
    /// Declared block size runs past the end of the buffer
    #[error("cannot open {request}-byte context window: parse-buffer has only {bytes_left} bytes remaining")]
    OpenWouldExceedBuffer { bytes_left: usize, request: usize },
    /// Declared block size runs past the end of the enclosing block
    #[error("cannot open context window ending at {request}: outside of current window ending at {limit}")]
    OpenWouldExceedWindow { limit: usize, request: usize },
    /// Block items ended before its declared size was used up
    #[error("cannot close context window with {residual} residual bytes")]
    CloseWithResidue { residual: usize },
    #[error("no context window to close")]
    CloseWithoutWindow,
    /// Offset found past the end of a window; only a parser bug can cause this
    #[error("BUG: detected an offset that exceeds the current limit by {excess} bytes")]
    OffsetOverflow { excess: usize },
}

/// Bytes that do not form a legal token
#[derive(Debug, PartialEq, Eq, Clone, thiserror::Error)]
pub enum TokenError {
    #[error("invalid boolean encoding 0x{0:02x}")]
    InvalidBoolean(u8),
    /// Varint did not terminate within the widest legal encoding
    #[error("varint failed to terminate within {max_width} bytes")]
    VarintOverflow { max_width: usize },
    /// Varint decoded to a value outside of the `int` range
    #[error("decoded value {0} is out of range for int")]
    IntOutOfRange(i64),
    /// Length prefix or block count whose value cannot be a length
    #[error("invalid length {0}")]
    NegativeLength(i64),
    #[error("string contents are not valid UTF-8")]
    InvalidUtf8,
    /// Enum ordinal outside of the declared symbol list
    #[error("enum ordinal {index} out of range for {count} symbols")]
    EnumIndex { index: i64, count: usize },
    /// Union index outside of the declared branch list
    #[error("union index {index} out of range for {count} branches")]
    UnionIndex { index: i64, count: usize },
}

/// Failures that indicate a bug in a `Parser` implementation
#[derive(Debug, Clone, Copy, thiserror::Error)]
pub enum InternalError {
    #[error("failed to coerce from byte-slice to fixed-length array")]
    SliceCoerceFailure(#[from] TryFromSliceError),
}

/// Copies a slice of exactly `N` bytes into an array
pub(crate) fn coerce_slice<const N: usize>(bytes: &[u8]) -> ParseResult<[u8; N]> {
    <[u8; N]>::try_from(bytes).map_err(|err| ParseError::from(InternalError::from(err)))
}

/// Any error that may be encountered while reading a value
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A registered logical-type conversion failed on a decoded base value
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    /// Bytes remained in the source after a complete datum was read
    #[error("{residual} bytes remain after a complete datum")]
    Leftover { residual: usize },
}

impl From<WindowError> for DecodeError {
    fn from(err: WindowError) -> Self {
        Self::Parse(err.into())
    }
}

impl From<TokenError> for DecodeError {
    fn from(err: TokenError) -> Self {
        Self::Parse(err.into())
    }
}

pub type DecodeResult<T> = std::result::Result<T, DecodeError>;
