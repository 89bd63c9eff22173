//! Schema-driven decoding of binary records.
//!
//! A [`RecordSchema`] declares named fields in wire order; each field
//! carries a kind ([`Schema`]) and optional directives (`condition`,
//! `skip`, `length`, `max`, `align`) written in a small expression
//! language that can reference fields decoded earlier in the same
//! record. [`Decoder`] walks the schema over any `Read + Seek` source
//! and produces a dynamic [`Value`].
//!
//! ```
//! use std::io::Cursor;
//! use binrec::{ByteOrder, Decoder, FieldSchema, Length, RecordSchema, Schema, Value};
//!
//! let schema = RecordSchema::builder("Chunk")
//!     .field(FieldSchema::new("Size", Schema::U16))
//!     .field(FieldSchema::new("Data", Schema::seq(Schema::U8)).length(Length::Expr("Size".into())))
//!     .build();
//!
//! let mut src = Cursor::new(vec![0x00, 0x03, b'a', b'b', b'c']);
//! let value = Decoder::new(&mut src, ByteOrder::Big)
//!     .decode_value(&Schema::Record(schema))
//!     .unwrap();
//!
//! let Value::Record(chunk) = value else { unreachable!() };
//! assert_eq!(chunk.get("Size"), Some(&Value::U16(3)));
//! assert_eq!(chunk.get("Data"), Some(&Value::Bytes(b"abc".to_vec())));
//! ```

mod decoder;
mod error;
mod schema;
mod value;

pub use binrec_buffers::{ByteOrder, ByteReader, ReadError, Source};
pub use binrec_expression::{EvalError, ParseError, Scope};

pub use decoder::{Decoder, DEFAULT_MAX_DEPTH};
pub use error::DecodeError;
pub use schema::{
    CustomDecode, FieldSchema, Length, RecordSchema, RecordSchemaBuilder, Schema, Validate,
};
pub use value::{RecordValue, Value};
