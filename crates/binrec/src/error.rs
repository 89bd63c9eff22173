use thiserror::Error;

use binrec_buffers::ReadError;
use binrec_expression::{EvalError, ParseError};

/// Failure of a decode call. Every error is terminal for the call: the
/// destination may be left partially populated.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The destination value cannot hold the schema's kind; the engine
    /// only writes through matching destinations.
    #[error("destination kind mismatch: schema expects {expected}, destination is {found}")]
    KindMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// The destination record lacks a field the schema declares.
    #[error("destination record has no field {0:?}")]
    MissingField(String),

    /// A sequence field had no resolvable length directive.
    #[error("sequence requires a length directive")]
    MissingLength,

    /// A `length` or `max` directive evaluated to a negative or
    /// unrepresentable size.
    #[error("length directive evaluated to invalid size {0}")]
    InvalidLength(i64),

    /// An `align` directive evaluated to a non-positive alignment.
    #[error("align directive evaluated to non-positive alignment {0}")]
    InvalidAlign(i64),

    /// Schema nesting exceeded the engine's depth limit.
    #[error("schema nesting exceeds depth limit {0}")]
    DepthLimit(usize),

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    /// Failure reported by a post-decode validation hook, surfaced
    /// verbatim as the decode's result.
    #[error("{0}")]
    Validation(String),
}
