//! The decoded value model: a closed union of decodable kinds.

use binrec_expression::Scope;

/// A decoded value. Mirrors [`crate::Schema`] kind-for-kind.
///
/// Sequences of single-byte elements decode as [`Value::Bytes`] (one raw
/// block, no per-element framing); all other sequences as [`Value::Seq`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Str(String),
    Bytes(Vec<u8>),
    Seq(Vec<Value>),
    Record(RecordValue),
}

impl Value {
    /// Integer view used by directive expressions. Unsigned 64-bit values
    /// wrap into the signed domain; `Bool` counts as 0/1; strings, floats,
    /// and containers have no integer form.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Bool(b) => Some(*b as i64),
            Value::U8(v) => Some(*v as i64),
            Value::U16(v) => Some(*v as i64),
            Value::U32(v) => Some(*v as i64),
            Value::U64(v) => Some(*v as i64),
            Value::I8(v) => Some(*v as i64),
            Value::I16(v) => Some(*v as i64),
            Value::I32(v) => Some(*v as i64),
            Value::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Kind label for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::Str(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Seq(_) => "sequence",
            Value::Record(_) => "record",
        }
    }
}

/// A record value: the type name plus named fields in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordValue {
    name: String,
    fields: Vec<(String, Value)>,
}

impl RecordValue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends a field. Order is the decode order.
    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.fields.push((name.into(), value));
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    /// Case-sensitive field lookup.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

impl Scope for RecordValue {
    fn resolve(&self, path: &[&str]) -> Option<i64> {
        let (first, rest) = path.split_first()?;
        let field = self.get(first)?;
        if rest.is_empty() {
            field.as_int()
        } else if let Value::Record(sub) = field {
            sub.resolve(rest)
        } else {
            None
        }
    }
}
