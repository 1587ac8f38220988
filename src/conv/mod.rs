//! Write side of the binary wire format
//!
//! This module contains the [`Encoder`] trait, which is the low-level
//! primitive-writing interface that the schema-directed dispatcher in
//! [`crate::write`] drives, and [`BinaryEncoder`], its implementation over the
//! compact binary encoding.
//!
//! The dispatcher never touches bytes directly: every wire-level decision
//! (varint widths, length prefixes, block framing) is made behind `Encoder`,
//! so that an alternative encoding can be substituted by implementing the
//! trait.
//!
//! An additional submodule, [`target`], offers an abstraction along the lines
//! of [`std::io::Write`], namely the [`target::Target`] trait. This is the dual
//! to [`crate::parse::Parser`], and the generic bound on the buffer a
//! `BinaryEncoder` writes into.

pub mod encoder;
pub mod target;

pub use encoder::{BinaryEncoder, Encoder};
pub use target::{ByteCounter, Target};
