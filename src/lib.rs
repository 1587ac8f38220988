//! Schema-directed writing and reading of dynamically-typed datums
//!
//! # Overview
//!
//! This crate maps loosely-typed, in-memory [`Value`]s onto the compact
//! binary encoding described by a [`Schema`], and back. The dispatcher in
//! [`write`] walks a schema and a value in lockstep, checking that the value
//! fits each node and emitting the node's primitive encoding through an
//! [`Encoder`](conv::Encoder). The dual path in [`read`] consumes primitives
//! from a [`Decoder`](parse::Decoder) and rebuilds a value in canonical form.
//!
//! The same abstract value can often be written in several shapes: a record
//! as a positional sequence or as a keyed mapping, an array as a generic
//! sequence or as a packed [`NumericArray`](value::NumericArray), a UUID as
//! a native [`uuid::Uuid`] or as its 16 raw bytes. Every accepted shape of a
//! value produces identical bytes.
//!
//! # Layout
//!
//! * [`schema`] holds the schema model, which is never mutated by a write.
//! * [`value`] holds the dynamically-typed value model.
//! * [`conv`] and [`parse`] hold the byte-level encoder and decoder, the
//!   latter built on a non-backtracking [`Parser`](parse::Parser) with
//!   context windows for size-prefixed blocks.
//! * [`logical`] holds the registry of logical-type conversions.
//! * [`names`] holds the conversions between symbolic and wire-safe names.
//! * [`config`] bundles the ambient choices of registry, naming and validation.
//!
//! # Validation modes
//!
//! In [`ValidationMode::Checked`], a record written from a keyed mapping may
//! only hold declared fields; in [`ValidationMode::Unchecked`], extra keys are
//! ignored. A [`Value::Annotated`] wrapper overrides the mode for its own
//! subtree only.

pub mod bytelike;
pub mod config;
pub mod conv;
pub mod error;
mod internal;
pub mod logical;
pub mod names;
pub mod parse;
pub mod prelude;
pub mod read;
pub mod schema;
pub mod util;
pub mod value;
pub mod varint;
pub mod write;

pub use crate::config::Config;
pub use crate::error::{EncodeError, EncodeResult};
pub use crate::logical::LogicalTypeRegistry;
pub use crate::parse::error::{DecodeError, DecodeResult};
pub use crate::read::DatumReader;
pub use crate::schema::Schema;
pub use crate::value::{ValidationMode, Value};
pub use crate::write::DatumWriter;
