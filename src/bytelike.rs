//! Uniform view over byte-bearing values
//!
//! `bytes` and `fixed` schema nodes accept two representations of opaque byte
//! content: an owned contiguous buffer ([`Vec<u8>`]) and a windowed view into a
//! shared buffer ([`ByteWindow`]). The [`ByteLike`] trait hides the difference,
//! so that the dispatcher never branches on representation at a byte leaf.
//!
//! Neither implementation copies its contents on the way to the encoder; both
//! hand their visible bytes to the [`Encoder`] as a borrowed slice.
//!
//! Additional representations can be supported by implementing `ByteLike`
//! and exposing them through [`Value::byte_like`](crate::value::Value::byte_like).

use bytes::Bytes;

use crate::conv::Encoder;

/// Byte content that can be written as a `bytes` or `fixed` datum
pub trait ByteLike {
    /// Number of bytes that would be emitted
    fn byte_len(&self) -> usize;

    /// Emits the content as a length-prefixed byte string
    fn emit_variable(&self, out: &mut dyn Encoder);

    /// Emits the content as raw bytes, with no length prefix
    fn emit_fixed(&self, out: &mut dyn Encoder);
}

impl ByteLike for [u8] {
    #[inline]
    fn byte_len(&self) -> usize {
        self.len()
    }

    fn emit_variable(&self, out: &mut dyn Encoder) {
        out.write_bytes(self)
    }

    fn emit_fixed(&self, out: &mut dyn Encoder) {
        out.write_fixed(self)
    }
}

impl ByteLike for Vec<u8> {
    #[inline]
    fn byte_len(&self) -> usize {
        self.len()
    }

    fn emit_variable(&self, out: &mut dyn Encoder) {
        self.as_slice().emit_variable(out)
    }

    fn emit_fixed(&self, out: &mut dyn Encoder) {
        self.as_slice().emit_fixed(out)
    }
}

impl ByteLike for Bytes {
    #[inline]
    fn byte_len(&self) -> usize {
        self.len()
    }

    fn emit_variable(&self, out: &mut dyn Encoder) {
        out.write_bytes(self)
    }

    fn emit_fixed(&self, out: &mut dyn Encoder) {
        out.write_fixed(self)
    }
}

/// Windowed view into a shared byte buffer
///
/// The view exposes the bytes between its read `position` and its `limit`,
/// and moves its position independently of any other view over the same
/// buffer. Cloning a `ByteWindow` shares the underlying buffer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ByteWindow {
    buf: Bytes,
    position: usize,
    limit: usize,
}

/// Error returned when a window would reach outside of its buffer
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("window {position}..{limit} does not fit in a {capacity}-byte buffer")]
pub struct WindowBoundsError {
    pub position: usize,
    pub limit: usize,
    pub capacity: usize,
}

impl ByteWindow {
    /// Creates a window spanning the entirety of `buf`
    pub fn new(buf: impl Into<Bytes>) -> Self {
        let buf: Bytes = buf.into();
        let limit = buf.len();
        Self {
            buf,
            position: 0,
            limit,
        }
    }

    /// Creates a window over `position..limit` of `buf`
    pub fn with_bounds(
        buf: impl Into<Bytes>,
        position: usize,
        limit: usize,
    ) -> Result<Self, WindowBoundsError> {
        let buf: Bytes = buf.into();
        if position > limit || limit > buf.len() {
            return Err(WindowBoundsError {
                position,
                limit,
                capacity: buf.len(),
            });
        }
        Ok(Self {
            buf,
            position,
            limit,
        })
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of bytes between the position and the limit
    pub fn remaining(&self) -> usize {
        self.limit - self.position
    }

    /// Advances the read position by up to `n` bytes, returning how far it moved
    pub fn advance(&mut self, n: usize) -> usize {
        let step = n.min(self.remaining());
        self.position += step;
        step
    }

    /// Returns the visible bytes of the window
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[self.position..self.limit]
    }

    /// Returns a buffer sharing storage with `self` that holds only the visible bytes
    pub fn to_bytes(&self) -> Bytes {
        self.buf.slice(self.position..self.limit)
    }
}

impl From<Bytes> for ByteWindow {
    fn from(buf: Bytes) -> Self {
        Self::new(buf)
    }
}

impl From<Vec<u8>> for ByteWindow {
    fn from(buf: Vec<u8>) -> Self {
        Self::new(buf)
    }
}

impl ByteLike for ByteWindow {
    #[inline]
    fn byte_len(&self) -> usize {
        self.remaining()
    }

    fn emit_variable(&self, out: &mut dyn Encoder) {
        out.write_bytes(self.as_slice())
    }

    fn emit_fixed(&self, out: &mut dyn Encoder) {
        out.write_fixed(self.as_slice())
    }
}
