//! Byte sinks for the binary encoder
//!
//! [`Target`] is the lowest layer of the write path: an append-only byte
//! buffer that [`BinaryEncoder`](super::BinaryEncoder) pushes wire bytes into.

use bytes::BytesMut;

/// Append-only byte buffer
///
/// `Target` plays the role of [`std::io::Write`] for the encoder, except that
/// every `push_*` method is infallible and total. The returned counts are
/// only used for book-keeping (see [`BinaryEncoder::bytes_written`]), never to
/// signal partial writes.
///
/// [`BinaryEncoder::bytes_written`]: super::BinaryEncoder::bytes_written
pub trait Target {
    /// Hints that at least `extra` more bytes are about to be pushed.
    ///
    /// Implementors with a notion of capacity should reserve accordingly; all
    /// others may treat this as a no-op. The hint may undercount.
    fn anticipate(&mut self, extra: usize);

    /// Returns an empty `Target`
    fn create() -> Self;

    /// Appends one byte, returning `1`
    fn push_one(&mut self, b: u8) -> usize;

    /// Appends a byte array of statically known length, returning `N`.
    ///
    /// Must be indistinguishable in effect from `N` calls to `push_one`.
    fn push_many<const N: usize>(&mut self, arr: [u8; N]) -> usize;

    /// Appends a byte slice, returning its length.
    ///
    /// Must be indistinguishable in effect from calling `push_one` on each
    /// byte in order.
    fn push_all(&mut self, buf: &[u8]) -> usize;
}

/// Alias for `std::io::Sink`, used to count the bytes an encoding would
/// occupy without storing any of them.
pub type ByteCounter = std::io::Sink;

impl Target for ByteCounter {
    #[inline(always)]
    fn anticipate(&mut self, _: usize) {}

    #[inline]
    fn create() -> Self {
        std::io::sink()
    }

    #[inline(always)]
    fn push_one(&mut self, _: u8) -> usize {
        1
    }

    #[inline(always)]
    fn push_many<const N: usize>(&mut self, _: [u8; N]) -> usize {
        N
    }

    #[inline(always)]
    fn push_all(&mut self, buf: &[u8]) -> usize {
        buf.len()
    }
}

impl Target for Vec<u8> {
    #[inline]
    fn anticipate(&mut self, extra: usize) {
        self.reserve(extra)
    }

    #[inline]
    #[must_use]
    fn create() -> Self {
        Self::new()
    }

    #[inline]
    fn push_one(&mut self, b: u8) -> usize {
        self.push(b);
        1
    }

    #[inline]
    fn push_many<const N: usize>(&mut self, arr: [u8; N]) -> usize {
        self.extend_from_slice(&arr);
        N
    }

    #[inline]
    fn push_all(&mut self, buf: &[u8]) -> usize {
        self.extend_from_slice(buf);
        buf.len()
    }
}

impl Target for BytesMut {
    #[inline]
    fn anticipate(&mut self, extra: usize) {
        self.reserve(extra)
    }

    #[inline]
    fn create() -> Self {
        BytesMut::new()
    }

    #[inline]
    fn push_one(&mut self, b: u8) -> usize {
        self.extend_from_slice(&[b]);
        1
    }

    #[inline]
    fn push_many<const N: usize>(&mut self, arr: [u8; N]) -> usize {
        self.extend_from_slice(&arr);
        N
    }

    #[inline]
    fn push_all(&mut self, buf: &[u8]) -> usize {
        self.extend_from_slice(buf);
        buf.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn fill<T: Target>() -> (T, usize) {
        let mut t = T::create();
        t.anticipate(6);
        let n = t.push_one(0x01) + t.push_many([0x02, 0x03]) + t.push_all(&[0x04, 0x05, 0x06]);
        (t, n)
    }

    #[test]
    fn targets_agree() {
        let (v, n) = fill::<Vec<u8>>();
        assert_eq!(n, 6);
        assert_eq!(v, vec![1, 2, 3, 4, 5, 6]);
        let (b, m) = fill::<BytesMut>();
        assert_eq!(m, 6);
        assert_eq!(&b[..], &v[..]);
        let (_, k) = fill::<ByteCounter>();
        assert_eq!(k, 6);
    }
}
