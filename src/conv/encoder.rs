use crate::conv::target::{ByteCounter, Target};
use crate::varint;

/// Low-level primitive writer
///
/// Collection writes follow a fixed protocol: `write_array_start` (or
/// `write_map_start`), then `set_item_count(n)`, then `n` repetitions of
/// `start_item` followed by the item's own writes (for a map, the key as a
/// string and then the value), then `write_array_end` (or `write_map_end`).
///
/// The `write_*_block` methods write the items of an array whose count has
/// already been set, without any `start_item` calls in between. Their default
/// implementations defer to the scalar methods one item at a time, and
/// implementors are free to override them with something faster, so long as
/// the bytes written are the same.
///
/// Every method is infallible: an `Encoder` is expected to accept whatever
/// sequence of calls the dispatcher makes, which is only ever a well-formed
/// one.
pub trait Encoder {
    fn write_null(&mut self);

    fn write_boolean(&mut self, b: bool);

    fn write_int(&mut self, n: i32);

    fn write_long(&mut self, n: i64);

    fn write_float(&mut self, x: f32);

    fn write_double(&mut self, x: f64);

    /// Writes a length-prefixed byte string
    fn write_bytes(&mut self, bytes: &[u8]);

    /// Writes a length-prefixed UTF-8 string
    fn write_string(&mut self, s: &str);

    /// Writes raw bytes without a length prefix
    fn write_fixed(&mut self, bytes: &[u8]);

    /// Writes the ordinal of an enum symbol
    fn write_enum(&mut self, ordinal: usize);

    /// Writes the index of the union branch that follows
    fn write_index(&mut self, index: usize);

    fn write_array_start(&mut self);

    /// Declares the number of items in the collection being written
    fn set_item_count(&mut self, count: usize);

    fn start_item(&mut self);

    fn write_array_end(&mut self);

    fn write_map_start(&mut self);

    fn write_map_end(&mut self);

    fn write_int_block(&mut self, items: &[i32]) {
        for &n in items {
            self.write_int(n);
        }
    }

    fn write_long_block(&mut self, items: &[i64]) {
        for &n in items {
            self.write_long(n);
        }
    }

    fn write_float_block(&mut self, items: &[f32]) {
        for &x in items {
            self.write_float(x);
        }
    }

    fn write_double_block(&mut self, items: &[f64]) {
        for &x in items {
            self.write_double(x);
        }
    }

    fn write_boolean_block(&mut self, items: &[bool]) {
        for &b in items {
            self.write_boolean(b);
        }
    }
}

/// [`Encoder`] for the compact binary encoding
///
/// Collections are written as a single block: a non-zero item count (omitted
/// for empty collections) followed by the items, then a zero terminator.
#[derive(Debug, Clone, Default)]
pub struct BinaryEncoder<T: Target = Vec<u8>> {
    buf: T,
    written: usize,
}

impl BinaryEncoder<Vec<u8>> {
    /// Creates an encoder writing into a fresh [`Vec<u8>`]
    #[must_use]
    pub fn new() -> Self {
        Self::with_target(Vec::new())
    }
}

impl BinaryEncoder<ByteCounter> {
    /// Creates an encoder that only counts the bytes it would write
    #[must_use]
    pub fn counter() -> Self {
        Self::with_target(std::io::sink())
    }
}

impl<T: Target> BinaryEncoder<T> {
    pub fn with_target(buf: T) -> Self {
        Self { buf, written: 0 }
    }

    pub fn into_inner(self) -> T {
        self.buf
    }

    pub fn get_ref(&self) -> &T {
        &self.buf
    }

    /// Total number of bytes written so far
    pub fn bytes_written(&self) -> usize {
        self.written
    }

    #[inline]
    fn push_varint(&mut self, n: i64) {
        self.written += varint::push_long(&mut self.buf, n);
    }

    #[inline]
    fn push_len(&mut self, len: usize) {
        // lengths beyond i64::MAX cannot be materialized in memory
        self.push_varint(len as i64);
    }
}

impl<T: Target> Encoder for BinaryEncoder<T> {
    #[inline]
    fn write_null(&mut self) {}

    #[inline]
    fn write_boolean(&mut self, b: bool) {
        self.written += self.buf.push_one(u8::from(b));
    }

    #[inline]
    fn write_int(&mut self, n: i32) {
        self.push_varint(i64::from(n));
    }

    #[inline]
    fn write_long(&mut self, n: i64) {
        self.push_varint(n);
    }

    #[inline]
    fn write_float(&mut self, x: f32) {
        self.written += self.buf.push_many(x.to_le_bytes());
    }

    #[inline]
    fn write_double(&mut self, x: f64) {
        self.written += self.buf.push_many(x.to_le_bytes());
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.push_len(bytes.len());
        self.written += self.buf.push_all(bytes);
    }

    fn write_string(&mut self, s: &str) {
        self.write_bytes(s.as_bytes())
    }

    fn write_fixed(&mut self, bytes: &[u8]) {
        self.written += self.buf.push_all(bytes);
    }

    fn write_enum(&mut self, ordinal: usize) {
        self.push_len(ordinal)
    }

    fn write_index(&mut self, index: usize) {
        self.push_len(index)
    }

    fn write_array_start(&mut self) {}

    fn set_item_count(&mut self, count: usize) {
        if count > 0 {
            self.push_len(count);
        }
    }

    fn start_item(&mut self) {}

    fn write_array_end(&mut self) {
        self.written += self.buf.push_one(0);
    }

    fn write_map_start(&mut self) {}

    fn write_map_end(&mut self) {
        self.written += self.buf.push_one(0);
    }

    fn write_float_block(&mut self, items: &[f32]) {
        self.buf.anticipate(items.len() * 4);
        for x in items {
            self.written += self.buf.push_many(x.to_le_bytes());
        }
    }

    fn write_double_block(&mut self, items: &[f64]) {
        self.buf.anticipate(items.len() * 8);
        for x in items {
            self.written += self.buf.push_many(x.to_le_bytes());
        }
    }

    fn write_boolean_block(&mut self, items: &[bool]) {
        self.buf.anticipate(items.len());
        for &b in items {
            self.written += self.buf.push_one(u8::from(b));
        }
    }
}
