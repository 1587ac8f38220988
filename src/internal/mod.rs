//! Low-level logic used throughout this crate
//!
//! The `offset` submodule holds the read position and window stack shared by
//! the buffer-backed `Parser` types, namely `SliceParser` and `ByteParser`.

pub(crate) mod offset;
