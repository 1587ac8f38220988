//! Read position and nested size windows for buffer-backed parsers
//!
//! [`ContextOffset`] is the only mutable state of
//! [`SliceParser`](crate::parse::SliceParser) and
//! [`ByteParser`](crate::parse::ByteParser). It tracks how many bytes have
//! been consumed, and a stack of windows opened for size-prefixed blocks.
//! While a window is open, nothing past its end can be consumed.

use std::cmp::Ordering;

use cfg_if::cfg_if;

use crate::parse::error::{ParseResult, WindowError};

cfg_if! {
    if #[cfg(feature = "smallvec_framestack")] {
        /// Nesting depth up to which window ends are stored inline
        pub const INLINE_FRAMES: usize = 8;

        type Frames = smallvec::SmallVec<[usize; INLINE_FRAMES]>;

        fn empty_frames() -> Frames {
            smallvec::SmallVec::new_const()
        }
    } else {
        type Frames = Vec<usize>;

        fn empty_frames() -> Frames {
            Vec::new()
        }
    }
}

/// Absolute end offsets of the open windows, innermost last.
///
/// Every pushed end lies at or before the one beneath it.
#[derive(Debug)]
#[repr(transparent)]
struct FrameStack(Frames);

impl FrameStack {
    fn innermost(&self) -> Option<usize> {
        self.0.last().copied()
    }

    fn open(&mut self, end: usize) -> ParseResult<()> {
        match self.innermost() {
            Some(limit) if end > limit => Err(WindowError::OpenWouldExceedWindow {
                limit,
                request: end,
            }
            .into()),
            _ => {
                self.0.push(end);
                Ok(())
            }
        }
    }

    fn close(&mut self) -> Option<usize> {
        self.0.pop()
    }
}

/// Compares the current offset against the end of a window
fn against_end(end: usize, cur: usize) -> ParseResult<Ordering> {
    match end.cmp(&cur) {
        Ordering::Less => Err(WindowError::OffsetOverflow { excess: cur - end }.into()),
        ord => Ok(ord),
    }
}

#[derive(Debug)]
pub struct ContextOffset {
    cur: usize,
    abs: usize,
    frames: FrameStack,
}

impl ContextOffset {
    /// Creates an offset at `0` over a buffer of `abs` bytes
    pub fn with_limit(abs: usize) -> Self {
        Self {
            cur: 0,
            abs,
            frames: FrameStack(empty_frames()),
        }
    }

    pub fn index(&self) -> usize {
        self.cur
    }

    pub fn absolute_limit(&self) -> usize {
        self.abs
    }

    /// End of the innermost window, or of the buffer
    pub fn limit(&self) -> usize {
        self.frames.innermost().unwrap_or(self.abs)
    }

    /// Moves the offset forward by `n` and returns where it started, or
    /// returns `None` and leaves the offset alone if that would pass `limit()`.
    pub fn advance(&mut self, n: usize) -> Option<usize> {
        let start = self.cur;
        let end = start.checked_add(n).filter(|&end| end <= self.limit())?;
        self.cur = end;
        Some(start)
    }

    /// Opens a window covering the next `winsize` bytes
    pub fn set_fit(&mut self, winsize: usize) -> ParseResult<()> {
        match self.cur.checked_add(winsize) {
            Some(end) if end <= self.abs => self.frames.open(end),
            _ => Err(WindowError::OpenWouldExceedBuffer {
                bytes_left: self.abs - self.cur,
                request: winsize,
            }
            .into()),
        }
    }

    /// Returns `true` if the innermost window is open and fully consumed
    pub fn test_target(&self) -> ParseResult<bool> {
        match self.frames.innermost() {
            Some(end) => Ok(against_end(end, self.cur)? == Ordering::Equal),
            None => Ok(false),
        }
    }

    /// Closes the innermost window, which must be fully consumed
    pub fn enforce_target(&mut self) -> ParseResult<()> {
        let end = self.frames.close().ok_or(WindowError::CloseWithoutWindow)?;
        match against_end(end, self.cur)? {
            Ordering::Equal => Ok(()),
            _ => Err(WindowError::CloseWithResidue {
                residual: end - self.cur,
            }
            .into()),
        }
    }
}
