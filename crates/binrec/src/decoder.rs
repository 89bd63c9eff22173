//! The schema-driven decode engine.
//!
//! [`Decoder`] walks a [`Schema`] against a seekable byte source and
//! populates a [`Value`] destination. Record fields are processed strictly
//! in declaration order — later fields' directives may reference earlier
//! fields' already-decoded values — with each field's directives handled
//! as: `condition`, `skip`, `length`, the value itself, then `align`.
//!
//! All engine state lives for one decode call; nothing is shared or
//! retained. On error the destination may be partially populated.

use binrec_buffers::{ByteOrder, ByteReader, Source};
use binrec_expression::{eval, parse};

use crate::error::DecodeError;
use crate::schema::{FieldSchema, Length, RecordSchema, Schema};
use crate::value::{RecordValue, Value};

/// Default bound on schema nesting depth (records and sequence elements).
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Decodes values described by a [`Schema`] from a borrowed byte source.
pub struct Decoder<'a> {
    reader: ByteReader<'a>,
    max_depth: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(source: &'a mut dyn Source, order: ByteOrder) -> Self {
        Self {
            reader: ByteReader::new(source, order),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Replaces the nesting depth limit. Guards against runaway recursion
    /// from malformed schemas.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Decodes one value of `schema` into a fresh default destination.
    pub fn decode_value(&mut self, schema: &Schema) -> Result<Value, DecodeError> {
        let mut dest = schema.default_value();
        self.decode(&mut dest, schema)?;
        Ok(dest)
    }

    /// Decodes into an existing destination, whose kind must match the
    /// schema's ([`DecodeError::KindMismatch`] otherwise).
    pub fn decode(&mut self, dest: &mut Value, schema: &Schema) -> Result<(), DecodeError> {
        self.read_value(dest, schema, None, None, 0)
    }

    fn read_value(
        &mut self,
        dest: &mut Value,
        schema: &Schema,
        size: Option<usize>,
        max: Option<usize>,
        depth: usize,
    ) -> Result<(), DecodeError> {
        if depth > self.max_depth {
            return Err(DecodeError::DepthLimit(self.max_depth));
        }
        match schema {
            Schema::Custom(hook) => hook.decode(dest, &mut self.reader),
            Schema::Bool => store(dest, Value::Bool(self.reader.read_u8()? != 0)),
            Schema::U8 => store(dest, Value::U8(self.reader.read_u8()?)),
            Schema::U16 => store(dest, Value::U16(self.reader.read_u16()?)),
            Schema::U32 => store(dest, Value::U32(self.reader.read_u32()?)),
            Schema::U64 => store(dest, Value::U64(self.reader.read_u64()?)),
            Schema::I8 => store(dest, Value::I8(self.reader.read_i8()?)),
            Schema::I16 => store(dest, Value::I16(self.reader.read_i16()?)),
            Schema::I32 => store(dest, Value::I32(self.reader.read_i32()?)),
            Schema::I64 => store(dest, Value::I64(self.reader.read_i64()?)),
            Schema::F32 => store(dest, Value::F32(self.reader.read_f32()?)),
            Schema::F64 => store(dest, Value::F64(self.reader.read_f64()?)),
            Schema::Str => {
                let s = self.read_string(size, max)?;
                store(dest, Value::Str(s))
            }
            Schema::Seq(elem) => {
                let n = size.ok_or(DecodeError::MissingLength)?;
                self.read_seq(dest, elem, n, depth)
            }
            Schema::Array(elem, n) => self.read_seq(dest, elem, *n, depth),
            Schema::Record(rs) => match dest {
                Value::Record(rv) => self.read_record(rv, rs, depth),
                other => Err(DecodeError::KindMismatch {
                    expected: "record",
                    found: other.kind_name(),
                }),
            },
        }
    }

    /// Sequence/array decode. Single-byte elements are read as one raw
    /// block; anything else is `n` recursive element decodes in order.
    fn read_seq(
        &mut self,
        dest: &mut Value,
        elem: &Schema,
        n: usize,
        depth: usize,
    ) -> Result<(), DecodeError> {
        if matches!(elem, Schema::U8) {
            let block = self.reader.read_bytes(n)?;
            return store(dest, Value::Bytes(block));
        }
        let mut items = Vec::with_capacity(n);
        for _ in 0..n {
            let mut item = elem.default_value();
            self.read_value(&mut item, elem, None, None, depth + 1)?;
            items.push(item);
        }
        store(dest, Value::Seq(items))
    }

    /// String decode. With a resolved size: read exactly that many bytes
    /// and truncate at the first NUL (trailing bytes are consumed and
    /// discarded). Without: scan byte-at-a-time until a NUL (consumed,
    /// excluded from the value) or until `max` bytes have been collected.
    fn read_string(
        &mut self,
        size: Option<usize>,
        max: Option<usize>,
    ) -> Result<String, DecodeError> {
        let data = match size {
            Some(n) => {
                let mut data = self.reader.read_bytes(n)?;
                if let Some(nul) = data.iter().position(|&b| b == 0) {
                    data.truncate(nul);
                }
                data
            }
            None => {
                let max = max.unwrap_or(usize::MAX);
                let mut data = Vec::new();
                while data.len() < max {
                    match self.reader.read_u8()? {
                        0 => break,
                        b => data.push(b),
                    }
                }
                data
            }
        };
        Ok(String::from_utf8_lossy(&data).into_owned())
    }

    fn read_record(
        &mut self,
        rv: &mut RecordValue,
        rs: &RecordSchema,
        depth: usize,
    ) -> Result<(), DecodeError> {
        for field in rs.fields() {
            self.read_field(rv, field, depth)?;
        }
        if let Some(hook) = rs.validator() {
            hook.validate(rv)?;
        }
        Ok(())
    }

    fn read_field(
        &mut self,
        rv: &mut RecordValue,
        field: &FieldSchema,
        depth: usize,
    ) -> Result<(), DecodeError> {
        if let Some(expr) = field.condition_expr() {
            if self.eval_directive(rv, expr)? == 0 {
                // Skipped entirely: default value, zero bytes consumed,
                // no alignment processing.
                return Ok(());
            }
        }
        if let Some(expr) = field.skip_expr() {
            let delta = self.eval_directive(rv, expr)?;
            self.reader.seek_by(delta)?;
        }

        let size = match field.length_directive() {
            Some(Length::U8) => Some(self.reader.read_u8()? as usize),
            Some(Length::U16) => Some(self.reader.read_u16()? as usize),
            Some(Length::U32) => {
                let n = self.reader.read_u32()?;
                Some(usize::try_from(n).map_err(|_| DecodeError::InvalidLength(n as i64))?)
            }
            Some(Length::U64) => {
                let n = self.reader.read_u64()?;
                Some(usize::try_from(n).map_err(|_| DecodeError::InvalidLength(n as i64))?)
            }
            Some(Length::Expr(expr)) => {
                let n = self.eval_directive(rv, expr)?;
                Some(usize::try_from(n).map_err(|_| DecodeError::InvalidLength(n))?)
            }
            None => None,
        };

        // `max` only applies to unbounded string scans; it is not
        // evaluated otherwise.
        let max = match (field.schema(), size, field.max_expr()) {
            (Schema::Str, None, Some(expr)) => {
                let n = self.eval_directive(rv, expr)?;
                Some(usize::try_from(n).map_err(|_| DecodeError::InvalidLength(n))?)
            }
            _ => None,
        };

        // Alignment accounts for the bytes the value itself consumed,
        // excluding the skip and the length prefix above.
        let start = self.reader.offset();
        let dest = rv
            .get_mut(field.name())
            .ok_or_else(|| DecodeError::MissingField(field.name().to_string()))?;
        self.read_value(dest, field.schema(), size, max, depth + 1)?;
        let consumed = self.reader.offset() - start;

        if let Some(expr) = field.align_expr() {
            let align = self.eval_directive(rv, expr)?;
            if align <= 0 {
                return Err(DecodeError::InvalidAlign(align));
            }
            let pad = if align < consumed {
                (consumed + align - 1) / align * align - consumed
            } else {
                align - consumed
            };
            if pad > 0 {
                self.reader.seek_by(pad)?;
            }
        }
        Ok(())
    }

    /// Parses and evaluates a directive expression against the record
    /// built so far. Each directive is parsed at most once per decode.
    fn eval_directive(&self, rv: &RecordValue, text: &str) -> Result<i64, DecodeError> {
        let node = parse(text)?;
        Ok(eval(rv, &node)?)
    }
}

fn store(dest: &mut Value, value: Value) -> Result<(), DecodeError> {
    if std::mem::discriminant(dest) == std::mem::discriminant(&value) {
        *dest = value;
        Ok(())
    } else {
        Err(DecodeError::KindMismatch {
            expected: value.kind_name(),
            found: dest.kind_name(),
        })
    }
}
