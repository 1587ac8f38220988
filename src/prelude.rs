//! Imports needed to write and read datums
//!
//! ```
//! use datum::prelude::*;
//!
//! let schema = Schema::array(Schema::long());
//! let bytes = DatumWriter::default()
//!     .to_bytes(&schema, &Value::from(vec![Value::Long(1)]))
//!     .unwrap();
//! assert_eq!(bytes, [0x02, 0x02, 0x00]);
//! ```

pub use crate::config::Config;
pub use crate::conv::{BinaryEncoder, Encoder};
pub use crate::error::{EncodeError, EncodeResult};
pub use crate::logical::{Conversion, LogicalTypeRegistry};
pub use crate::names::{DashUnderscore, Identity, NameCodec};
pub use crate::parse::error::{DecodeError, DecodeResult};
pub use crate::parse::{BinaryDecoder, ByteParser, Decoder, SliceParser};
pub use crate::read::DatumReader;
pub use crate::schema::{Field, LogicalType, Name, Schema};
pub use crate::value::{NumericArray, ValidationMode, Value};
pub use crate::write::DatumWriter;
