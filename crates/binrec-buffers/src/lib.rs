//! Byte-order-aware reads over any seekable byte source.
//!
//! [`ByteReader`] borrows a [`Source`] (anything that is `io::Read +
//! io::Seek`) together with a caller-selected [`ByteOrder`] and exposes
//! fallible fixed-width reads plus relative seeks. It also keeps a running
//! offset of bytes consumed, which schema-driven decoders use for alignment
//! accounting.
//!
//! # Example
//!
//! ```
//! use binrec_buffers::{ByteOrder, ByteReader};
//! use std::io::Cursor;
//!
//! let mut src = Cursor::new(vec![0x01, 0x02, 0x03, 0x04]);
//! let mut reader = ByteReader::new(&mut src, ByteOrder::Big);
//!
//! assert_eq!(reader.read_u16().unwrap(), 0x0102);
//! assert_eq!(reader.read_u16().unwrap(), 0x0304);
//! assert_eq!(reader.offset(), 4);
//! ```

mod error;
mod reader;

pub use error::ReadError;
pub use reader::{ByteOrder, ByteReader, Source};
