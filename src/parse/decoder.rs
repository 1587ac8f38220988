use crate::parse::error::{ParseResult, TokenError};
use crate::parse::Parser;
use crate::varint::{self, MAX_INT_WIDTH, MAX_LONG_WIDTH};

/// Low-level primitive reader, the dual of [`Encoder`](crate::conv::Encoder)
///
/// Collections are read block by block: `read_array_start` (or
/// `read_map_start`) returns the item count of the first block, and after
/// that many items have been read, `array_next` (or `map_next`) returns the
/// count of the following block. A count of zero marks the end of the
/// collection.
pub trait Decoder {
    fn read_null(&mut self) -> ParseResult<()>;

    fn read_boolean(&mut self) -> ParseResult<bool>;

    fn read_int(&mut self) -> ParseResult<i32>;

    fn read_long(&mut self) -> ParseResult<i64>;

    fn read_float(&mut self) -> ParseResult<f32>;

    fn read_double(&mut self) -> ParseResult<f64>;

    fn read_bytes(&mut self) -> ParseResult<Vec<u8>>;

    fn read_string(&mut self) -> ParseResult<String>;

    fn read_fixed(&mut self, size: usize) -> ParseResult<Vec<u8>>;

    /// Reads an enum ordinal, which must be less than `count`
    fn read_enum(&mut self, count: usize) -> ParseResult<usize>;

    /// Reads a union branch index, which must be less than `count`
    fn read_index(&mut self, count: usize) -> ParseResult<usize>;

    fn read_array_start(&mut self) -> ParseResult<usize>;

    fn array_next(&mut self) -> ParseResult<usize>;

    fn read_map_start(&mut self) -> ParseResult<usize>;

    fn map_next(&mut self) -> ParseResult<usize>;

    /// Returns `true` when the source holds no more bytes
    fn is_exhausted(&self) -> bool;
}

/// [`Decoder`] for the compact binary encoding, over any [`Parser`]
///
/// Blocks with a negative count carry their byte-size, which is enforced by
/// opening a context window over the block's items.
#[derive(Debug)]
pub struct BinaryDecoder<P: Parser> {
    parser: P,
    // one entry per open collection; `true` while its current block is windowed
    windows: Vec<bool>,
}

impl<P: Parser> BinaryDecoder<P> {
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            windows: Vec::new(),
        }
    }

    pub fn get_ref(&self) -> &P {
        &self.parser
    }

    pub fn into_inner(self) -> P {
        self.parser
    }

    fn read_len(&mut self) -> ParseResult<usize> {
        let n = self.read_long()?;
        usize::try_from(n).map_err(|_| TokenError::NegativeLength(n).into())
    }

    fn open_collection(&mut self) -> ParseResult<usize> {
        self.windows.push(false);
        self.next_block()
    }

    fn next_block(&mut self) -> ParseResult<usize> {
        if let Some(windowed) = self.windows.last_mut() {
            if *windowed {
                *windowed = false;
                self.parser.enforce_target()?;
            }
        }
        let count = self.read_long()?;
        if count == 0 {
            self.windows.pop();
            return Ok(0);
        }
        if count < 0 {
            let items = count
                .checked_neg()
                .and_then(|n| usize::try_from(n).ok())
                .ok_or(TokenError::NegativeLength(count))?;
            let size = self.read_len()?;
            self.parser.set_fit(size)?;
            if let Some(windowed) = self.windows.last_mut() {
                *windowed = true;
            }
            return Ok(items);
        }
        usize::try_from(count).map_err(|_| TokenError::NegativeLength(count).into())
    }

    fn read_bounded(&mut self, count: usize, enum_like: bool) -> ParseResult<usize> {
        let index = i64::from(self.read_int()?);
        match usize::try_from(index) {
            Ok(ix) if ix < count => Ok(ix),
            _ if enum_like => Err(TokenError::EnumIndex { index, count }.into()),
            _ => Err(TokenError::UnionIndex { index, count }.into()),
        }
    }
}

impl<P: Parser> Decoder for BinaryDecoder<P> {
    fn read_null(&mut self) -> ParseResult<()> {
        Ok(())
    }

    fn read_boolean(&mut self) -> ParseResult<bool> {
        match self.parser.consume_byte()? {
            0x00 => Ok(false),
            0x01 => Ok(true),
            byte => Err(TokenError::InvalidBoolean(byte).into()),
        }
    }

    fn read_int(&mut self) -> ParseResult<i32> {
        let n = varint::take_long(&mut self.parser, MAX_INT_WIDTH)?;
        i32::try_from(n).map_err(|_| TokenError::IntOutOfRange(n).into())
    }

    fn read_long(&mut self) -> ParseResult<i64> {
        varint::take_long(&mut self.parser, MAX_LONG_WIDTH)
    }

    fn read_float(&mut self) -> ParseResult<f32> {
        self.parser.consume_arr::<4>().map(f32::from_le_bytes)
    }

    fn read_double(&mut self) -> ParseResult<f64> {
        self.parser.consume_arr::<8>().map(f64::from_le_bytes)
    }

    fn read_bytes(&mut self) -> ParseResult<Vec<u8>> {
        let len = self.read_len()?;
        self.parser.consume(len).map(Vec::from)
    }

    fn read_string(&mut self) -> ParseResult<String> {
        let raw = self.read_bytes()?;
        String::from_utf8(raw).map_err(|_| TokenError::InvalidUtf8.into())
    }

    fn read_fixed(&mut self, size: usize) -> ParseResult<Vec<u8>> {
        self.parser.consume(size).map(Vec::from)
    }

    fn read_enum(&mut self, count: usize) -> ParseResult<usize> {
        self.read_bounded(count, true)
    }

    fn read_index(&mut self, count: usize) -> ParseResult<usize> {
        self.read_bounded(count, false)
    }

    fn read_array_start(&mut self) -> ParseResult<usize> {
        self.open_collection()
    }

    fn array_next(&mut self) -> ParseResult<usize> {
        self.next_block()
    }

    fn read_map_start(&mut self) -> ParseResult<usize> {
        self.open_collection()
    }

    fn map_next(&mut self) -> ParseResult<usize> {
        self.next_block()
    }

    fn is_exhausted(&self) -> bool {
        self.parser.is_exhausted()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parse::error::{ParseError, WindowError};
    use crate::parse::SliceParser;

    fn decoder(bytes: &[u8]) -> BinaryDecoder<SliceParser<'_>> {
        BinaryDecoder::new(SliceParser::new(bytes))
    }

    #[test]
    fn scalars() {
        let mut d = decoder(&[0x01, 0x05, 0x80, 0x01, 0x04, b'h', b'i']);
        assert!(d.read_boolean().unwrap());
        assert_eq!(d.read_int().unwrap(), -3);
        assert_eq!(d.read_long().unwrap(), 64);
        assert_eq!(d.read_string().unwrap(), "hi");
        assert!(d.is_exhausted());
    }

    #[test]
    fn bad_boolean() {
        let mut d = decoder(&[0x02]);
        assert!(matches!(
            d.read_boolean(),
            Err(ParseError::Token(TokenError::InvalidBoolean(2)))
        ));
    }

    #[test]
    fn int_range_checked() {
        // zig-zag of 2^31
        let mut d = decoder(&[0x80, 0x80, 0x80, 0x80, 0x10]);
        assert!(matches!(
            d.read_int(),
            Err(ParseError::Token(TokenError::IntOutOfRange(_)))
        ));
    }

    #[test]
    fn multi_block_array() {
        // block of 2, then a sized block of 1 (count -1, size 1), then end
        let mut d = decoder(&[0x04, 0x02, 0x04, 0x01, 0x02, 0x06, 0x00]);
        let mut items = Vec::new();
        let mut count = d.read_array_start().unwrap();
        while count > 0 {
            for _ in 0..count {
                items.push(d.read_int().unwrap());
            }
            count = d.array_next().unwrap();
        }
        assert_eq!(items, vec![1, 2, 3]);
        assert!(d.is_exhausted());
    }

    #[test]
    fn sized_block_must_be_consumed() {
        // count -1, declared size 2, but the single item is one byte
        let mut d = decoder(&[0x01, 0x04, 0x02, 0x00, 0x00]);
        assert_eq!(d.read_array_start().unwrap(), 1);
        assert_eq!(d.read_int().unwrap(), 1);
        assert!(matches!(
            d.array_next(),
            Err(ParseError::Window(WindowError::CloseWithResidue { residual: 1 }))
        ));
    }

    #[test]
    fn union_index_bounded() {
        let mut d = decoder(&[0x04]);
        assert!(matches!(
            d.read_index(2),
            Err(ParseError::Token(TokenError::UnionIndex { index: 2, count: 2 }))
        ));
    }
}
