//! Schema model: decodable kinds, per-field directives, and the capability
//! hooks types may supply.

use std::fmt;
use std::sync::Arc;

use binrec_buffers::ByteReader;

use crate::error::DecodeError;
use crate::value::{RecordValue, Value};

/// A field's `length` directive: a prefix marker (read a length of that
/// width immediately before the data) or an expression evaluated against
/// the enclosing record. Marker and expression are mutually exclusive by
/// construction.
#[derive(Debug, Clone)]
pub enum Length {
    U8,
    U16,
    U32,
    U64,
    Expr(String),
}

/// Capability hook: a type-supplied decode routine invoked instead of the
/// generic dispatch. Independent of any type hierarchy.
pub trait CustomDecode: Send + Sync {
    /// The destination the engine allocates before invoking [`Self::decode`],
    /// and the value a `condition`-skipped field keeps.
    fn default_value(&self) -> Value;

    fn decode(&self, dest: &mut Value, reader: &mut ByteReader<'_>) -> Result<(), DecodeError>;
}

/// Capability hook: post-decode validation. Runs after a record's fields
/// are decoded; its error becomes the decode's result, verbatim.
pub trait Validate: Send + Sync {
    fn validate(&self, record: &RecordValue) -> Result<(), DecodeError>;
}

/// The declared kind of a decode destination.
#[derive(Clone)]
pub enum Schema {
    Bool,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    /// Length-prefixed, expression-sized, or NUL-terminated depending on
    /// the enclosing field's directives.
    Str,
    /// Dynamically sized sequence; the element count always comes from the
    /// enclosing field's `length` directive.
    Seq(Box<Schema>),
    /// Fixed-size array; the element count is part of the schema.
    Array(Box<Schema>, usize),
    Record(Arc<RecordSchema>),
    Custom(Arc<dyn CustomDecode>),
}

impl Schema {
    pub fn seq(elem: Schema) -> Self {
        Schema::Seq(Box::new(elem))
    }

    pub fn array(elem: Schema, len: usize) -> Self {
        Schema::Array(Box::new(elem), len)
    }

    /// The zeroed destination the decoder populates. Fields whose
    /// `condition` evaluates to 0 keep this value.
    pub fn default_value(&self) -> Value {
        match self {
            Schema::Bool => Value::Bool(false),
            Schema::U8 => Value::U8(0),
            Schema::U16 => Value::U16(0),
            Schema::U32 => Value::U32(0),
            Schema::U64 => Value::U64(0),
            Schema::I8 => Value::I8(0),
            Schema::I16 => Value::I16(0),
            Schema::I32 => Value::I32(0),
            Schema::I64 => Value::I64(0),
            Schema::F32 => Value::F32(0.0),
            Schema::F64 => Value::F64(0.0),
            Schema::Str => Value::Str(String::new()),
            Schema::Seq(elem) => match **elem {
                Schema::U8 => Value::Bytes(Vec::new()),
                _ => Value::Seq(Vec::new()),
            },
            Schema::Array(elem, n) => match **elem {
                Schema::U8 => Value::Bytes(vec![0; *n]),
                _ => Value::Seq(vec![elem.default_value(); *n]),
            },
            Schema::Record(rs) => Value::Record(rs.default_record()),
            Schema::Custom(hook) => hook.default_value(),
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Bool => f.write_str("Bool"),
            Schema::U8 => f.write_str("U8"),
            Schema::U16 => f.write_str("U16"),
            Schema::U32 => f.write_str("U32"),
            Schema::U64 => f.write_str("U64"),
            Schema::I8 => f.write_str("I8"),
            Schema::I16 => f.write_str("I16"),
            Schema::I32 => f.write_str("I32"),
            Schema::I64 => f.write_str("I64"),
            Schema::F32 => f.write_str("F32"),
            Schema::F64 => f.write_str("F64"),
            Schema::Str => f.write_str("Str"),
            Schema::Seq(elem) => f.debug_tuple("Seq").field(elem).finish(),
            Schema::Array(elem, n) => f.debug_tuple("Array").field(elem).field(n).finish(),
            Schema::Record(rs) => f.debug_tuple("Record").field(&rs.name()).finish(),
            Schema::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Per-field schema: the field's kind plus its directive set. Directives
/// hold expression *text*; the engine parses each at most once per decode
/// call, against the record being built.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    name: String,
    schema: Schema,
    condition: Option<String>,
    skip: Option<String>,
    length: Option<Length>,
    max: Option<String>,
    align: Option<String>,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            condition: None,
            skip: None,
            length: None,
            max: None,
            align: None,
        }
    }

    /// Field is skipped entirely (default value, zero bytes) when the
    /// expression evaluates to 0.
    pub fn condition(mut self, expr: impl Into<String>) -> Self {
        self.condition = Some(expr.into());
        self
    }

    /// Bytes to seek forward, relative to the current position, before
    /// reading the field.
    pub fn skip(mut self, expr: impl Into<String>) -> Self {
        self.skip = Some(expr.into());
        self
    }

    pub fn length(mut self, length: Length) -> Self {
        self.length = Some(length);
        self
    }

    /// Scan cap for unbounded strings; ignored when `length` is set.
    pub fn max(mut self, expr: impl Into<String>) -> Self {
        self.max = Some(expr.into());
        self
    }

    /// Required alignment for the next read position, applied after the
    /// field is fully read.
    pub fn align(mut self, expr: impl Into<String>) -> Self {
        self.align = Some(expr.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub(crate) fn condition_expr(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    pub(crate) fn skip_expr(&self) -> Option<&str> {
        self.skip.as_deref()
    }

    pub(crate) fn length_directive(&self) -> Option<&Length> {
        self.length.as_ref()
    }

    pub(crate) fn max_expr(&self) -> Option<&str> {
        self.max.as_deref()
    }

    pub(crate) fn align_expr(&self) -> Option<&str> {
        self.align.as_deref()
    }
}

/// A record type: named, ordered fields plus an optional validation hook.
pub struct RecordSchema {
    name: String,
    fields: Vec<FieldSchema>,
    validate: Option<Arc<dyn Validate>>,
}

impl RecordSchema {
    pub fn builder(name: impl Into<String>) -> RecordSchemaBuilder {
        RecordSchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
            validate: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub(crate) fn validator(&self) -> Option<&dyn Validate> {
        self.validate.as_deref()
    }

    /// A record with every field at its default value.
    pub fn default_record(&self) -> RecordValue {
        let mut rec = RecordValue::new(self.name.clone());
        for field in &self.fields {
            rec.push(field.name(), field.schema().default_value());
        }
        rec
    }
}

impl fmt::Debug for RecordSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSchema")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("validate", &self.validate.is_some())
            .finish()
    }
}

/// Declarative builder for [`RecordSchema`].
pub struct RecordSchemaBuilder {
    name: String,
    fields: Vec<FieldSchema>,
    validate: Option<Arc<dyn Validate>>,
}

impl RecordSchemaBuilder {
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    pub fn validate(mut self, hook: Arc<dyn Validate>) -> Self {
        self.validate = Some(hook);
        self
    }

    pub fn build(self) -> Arc<RecordSchema> {
        Arc::new(RecordSchema {
            name: self.name,
            fields: self.fields,
            validate: self.validate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_are_zeroed() {
        assert_eq!(Schema::Bool.default_value(), Value::Bool(false));
        assert_eq!(Schema::U32.default_value(), Value::U32(0));
        assert_eq!(Schema::Str.default_value(), Value::Str(String::new()));
        assert_eq!(
            Schema::seq(Schema::U8).default_value(),
            Value::Bytes(Vec::new())
        );
        assert_eq!(
            Schema::array(Schema::U8, 3).default_value(),
            Value::Bytes(vec![0, 0, 0])
        );
        assert_eq!(
            Schema::array(Schema::U16, 2).default_value(),
            Value::Seq(vec![Value::U16(0), Value::U16(0)])
        );
    }

    #[test]
    fn default_record_carries_all_fields_in_order() {
        let schema = RecordSchema::builder("Header")
            .field(FieldSchema::new("Magic", Schema::U32))
            .field(FieldSchema::new("Name", Schema::Str))
            .build();
        let rec = schema.default_record();
        assert_eq!(rec.name(), "Header");
        assert_eq!(rec.fields().len(), 2);
        assert_eq!(rec.get("Magic"), Some(&Value::U32(0)));
        assert_eq!(rec.get("Name"), Some(&Value::Str(String::new())));
    }
}
