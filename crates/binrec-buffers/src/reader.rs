//! The byte-level reader: fixed-width reads and relative seeks.

use std::io::{ErrorKind, Read, Seek, SeekFrom};

use crate::ReadError;

/// Byte order used to interpret multi-byte values. Supplied by the caller,
/// never auto-detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Big,
    Little,
}

/// A seekable byte source. Blanket-implemented for anything that is
/// `Read + Seek`, e.g. `std::fs::File` or `std::io::Cursor`.
pub trait Source: Read + Seek {}

impl<T: Read + Seek + ?Sized> Source for T {}

/// Reads fixed-width integers and floats of a configured byte order from a
/// seekable source.
///
/// The reader borrows the source for its own lifetime only; it never closes
/// it. All successful reads advance [`ByteReader::offset`] by the number of
/// bytes consumed; seeks adjust it by the seek delta.
pub struct ByteReader<'a> {
    src: &'a mut dyn Source,
    order: ByteOrder,
    offset: i64,
}

macro_rules! read_int {
    ($name:ident, $ty:ty, $width:expr) => {
        #[inline]
        pub fn $name(&mut self) -> Result<$ty, ReadError> {
            let bytes = self.read_array::<$width>()?;
            Ok(match self.order {
                ByteOrder::Big => <$ty>::from_be_bytes(bytes),
                ByteOrder::Little => <$ty>::from_le_bytes(bytes),
            })
        }
    };
}

impl<'a> ByteReader<'a> {
    pub fn new(src: &'a mut dyn Source, order: ByteOrder) -> Self {
        Self {
            src,
            order,
            offset: 0,
        }
    }

    /// The configured byte order.
    pub fn order(&self) -> ByteOrder {
        self.order
    }

    /// Bytes consumed since construction, adjusted by seeks.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Reads exactly `n` bytes. Reading zero bytes succeeds without
    /// touching the source.
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>, ReadError> {
        let mut buf = vec![0u8; n];
        if n == 0 {
            return Ok(buf);
        }
        self.fill(&mut buf)?;
        Ok(buf)
    }

    #[inline]
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ReadError> {
        let mut buf = [0u8; N];
        self.fill(&mut buf)?;
        Ok(buf)
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<(), ReadError> {
        self.src.read_exact(buf).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => ReadError::ShortRead { wanted: buf.len() },
            _ => ReadError::Io(e),
        })?;
        self.offset += buf.len() as i64;
        Ok(())
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        Ok(self.read_array::<1>()?[0])
    }

    #[inline]
    pub fn read_i8(&mut self) -> Result<i8, ReadError> {
        Ok(self.read_array::<1>()?[0] as i8)
    }

    read_int!(read_u16, u16, 2);
    read_int!(read_u32, u32, 4);
    read_int!(read_u64, u64, 8);
    read_int!(read_i16, i16, 2);
    read_int!(read_i32, i32, 4);
    read_int!(read_i64, i64, 8);

    /// Reads an `f32` by reinterpreting the bit pattern of a `u32` read.
    /// Any bit pattern is accepted, including NaN and infinities.
    #[inline]
    pub fn read_f32(&mut self) -> Result<f32, ReadError> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    /// Reads an `f64` by reinterpreting the bit pattern of a `u64` read.
    #[inline]
    pub fn read_f64(&mut self) -> Result<f64, ReadError> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    /// Seeks relative to the current position. Forward or backward; the
    /// offset counter follows the delta.
    pub fn seek_by(&mut self, delta: i64) -> Result<(), ReadError> {
        self.src
            .seek(SeekFrom::Current(delta))
            .map_err(ReadError::Seek)?;
        self.offset += delta;
        Ok(())
    }
}
