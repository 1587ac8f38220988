//! Zig-zag variable-length integers
//!
//! Both `int` and `long` are written as a zig-zag mapped integer (so that
//! values of small magnitude, negative or not, have short encodings), in
//! little-endian groups of seven bits, with the high bit of each byte set
//! on every byte but the last.
//!
//! Like other self-terminating encodings, a varint is read one byte at a time
//! until a byte with a clear high bit is seen, and the read fails if the
//! encoding runs longer than the widest legal value.

use crate::conv::target::Target;
use crate::parse::error::{ParseResult, TokenError};
use crate::parse::Parser;

/// Maximum encoded width of an `int`
pub const MAX_INT_WIDTH: usize = 5;

/// Maximum encoded width of a `long`
pub const MAX_LONG_WIDTH: usize = 10;

#[inline]
pub const fn zigzag(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

#[inline]
pub const fn unzigzag(n: u64) -> i64 {
    ((n >> 1) as i64) ^ -((n & 1) as i64)
}

/// Pushes the varint encoding of `n` onto `tgt`, returning the number of bytes written
pub fn push_long<U: Target>(tgt: &mut U, n: i64) -> usize {
    let mut buf = [0u8; MAX_LONG_WIDTH];
    let mut v = zigzag(n);
    let mut len = 0;
    while v >= 0x80 {
        buf[len] = (v as u8) | 0x80;
        v >>= 7;
        len += 1;
    }
    buf[len] = v as u8;
    tgt.push_all(&buf[..=len])
}

/// Consumes a varint of at most `max_width` bytes and returns its zig-zag decoded value
pub fn take_long<P: Parser + ?Sized>(p: &mut P, max_width: usize) -> ParseResult<i64> {
    let mut acc: u64 = 0;
    for ix in 0..max_width {
        let byte = p.consume_byte()?;
        acc |= u64::from(byte & 0x7f) << (7 * ix);
        if byte & 0x80 == 0 {
            return Ok(unzigzag(acc));
        }
    }
    Err(TokenError::VarintOverflow { max_width }.into())
}
