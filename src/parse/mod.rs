//! Byte-level parsing model
//!
//! This module, along with its submodules, provides the read side of the wire
//! format: the [`Parser`] trait, which hands out raw bytes from a buffer under
//! a model of nested *context windows*, and the [`Decoder`] trait, which reads
//! wire primitives (varints, floats, length-prefixed strings, collection
//! blocks) on top of a `Parser`.
//!
//! # Layout
//!
//! * `error` defines the errors that can be returned by `Parser` and `Decoder`
//!   methods, along with the top-level [`DecodeError`](error::DecodeError).
//! * `decoder` defines `Decoder` and its binary implementation `BinaryDecoder`.
//!
//! Two implementing types of `Parser` are defined here: [`SliceParser`], over
//! a borrowed slice, and [`ByteParser`], over an owned [`bytes::Bytes`]
//! buffer.

pub mod decoder;
pub mod error;

use bytes::Bytes;

pub use decoder::{BinaryDecoder, Decoder};
pub use error::{ParseError, ParseResult};

use crate::internal::offset::ContextOffset;
use error::WindowError;

/// # Parser
///
/// Abstraction over a stateful, non-backtracking parse-object.
///
/// ## Model
///
/// * The Parser-object is constructed over an immutable byte-buffer.
/// * A byte in the buffer can only be viewed by consuming it, and only after
///   all preceding bytes have been consumed. Once consumed, it cannot be
///   consumed again.
/// * A *context-window*, or a bounded contiguous view of a section of the
///   buffer, may be opened with [`set_fit`](Parser::set_fit). While it is open,
///   bytes beyond its upper bound cannot be consumed. It can only be closed
///   with [`enforce_target`](Parser::enforce_target), once every byte within it
///   has been consumed.
///
/// The following properties hold for each implementation:
///
/// * A fresh parser has `offset() == 0` and `view_len()` equal to the buffer length.
/// * `remainder()` is the largest `n` for which `consume(n)` succeeds, and the largest
///   `n` for which `set_fit(n)` succeeds.
/// * Immediately after a successful `set_fit(n)`, `remainder() == n`.
pub trait Parser {
    /// Upper bound on the offset in the current context: the end of the
    /// innermost context window, or the end of the buffer.
    fn view_len(&self) -> usize;

    /// Number of bytes consumed so far
    fn offset(&self) -> usize;

    /// Number of bytes that can be consumed in the current context
    fn remainder(&self) -> usize {
        self.view_len() - self.offset()
    }

    /// Consumes and returns a single byte
    fn consume_byte(&mut self) -> ParseResult<u8>;

    /// Consumes and returns exactly `nbytes` bytes, or nothing at all
    fn consume(&mut self, nbytes: usize) -> ParseResult<&[u8]>;

    /// Opens a context-window permitting exactly `n` more bytes to be consumed
    fn set_fit(&mut self, n: usize) -> ParseResult<()>;

    /// Returns `true` if a context window is open and fully consumed
    fn test_target(&mut self) -> ParseResult<bool>;

    /// Closes the innermost context-window, which must be fully consumed
    fn enforce_target(&mut self) -> ParseResult<()>;

    /// Consumes `N` bytes and returns them in array-form
    fn consume_arr<const N: usize>(&mut self) -> ParseResult<[u8; N]>
    where
        Self: Sized,
    {
        error::coerce_slice(self.consume(N)?)
    }

    /// Returns `true` when every byte of the buffer has been consumed
    fn is_exhausted(&self) -> bool;
}

/// `Parser` over a borrowed byte slice
#[derive(Debug)]
pub struct SliceParser<'a> {
    buf: &'a [u8],
    offset: ContextOffset,
}

impl<'a> SliceParser<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            offset: ContextOffset::with_limit(buf.len()),
        }
    }
}

/// `Parser` over an owned, cheaply cloneable [`Bytes`] buffer
#[derive(Debug)]
pub struct ByteParser {
    buf: Bytes,
    offset: ContextOffset,
}

impl ByteParser {
    pub fn new(buf: impl Into<Bytes>) -> Self {
        let buf: Bytes = buf.into();
        let offset = ContextOffset::with_limit(buf.len());
        Self { buf, offset }
    }
}

fn advance(offset: &mut ContextOffset, nbytes: usize) -> ParseResult<usize> {
    offset.advance(nbytes).ok_or_else(|| {
        WindowError::ConsumeWouldExceedLimit {
            offset: offset.index(),
            requested: nbytes,
            limit: offset.limit(),
        }
        .into()
    })
}

macro_rules! impl_parser {
    ( $( $t:ty ),+ $(,)? ) => {
        $(
            impl Parser for $t {
                #[inline]
                fn view_len(&self) -> usize {
                    self.offset.limit()
                }

                #[inline]
                fn offset(&self) -> usize {
                    self.offset.index()
                }

                fn consume_byte(&mut self) -> ParseResult<u8> {
                    let ix = advance(&mut self.offset, 1)?;
                    Ok(self.buf[ix])
                }

                fn consume(&mut self, nbytes: usize) -> ParseResult<&[u8]> {
                    let ix = advance(&mut self.offset, nbytes)?;
                    Ok(&self.buf[ix..ix + nbytes])
                }

                fn set_fit(&mut self, n: usize) -> ParseResult<()> {
                    self.offset.set_fit(n)
                }

                fn test_target(&mut self) -> ParseResult<bool> {
                    self.offset.test_target()
                }

                fn enforce_target(&mut self) -> ParseResult<()> {
                    self.offset.enforce_target()
                }

                fn is_exhausted(&self) -> bool {
                    self.offset.index() == self.offset.absolute_limit()
                }
            }
        )+
    };
}

impl_parser!(SliceParser<'_>, ByteParser);
