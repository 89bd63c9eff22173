use thiserror::Error;

/// Parse failure, pointing at the first input the grammar could not consume.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected} at offset {offset}, unparsed input: {remainder:?}")]
pub struct ParseError {
    pub expected: &'static str,
    pub offset: usize,
    pub remainder: String,
}

/// Evaluation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// A dotted identifier did not resolve to an integer field of the
    /// record in scope: an unknown name, a descent through a non-record
    /// field, or a final step whose value has no integer form.
    #[error("unresolved path: {0}")]
    UnresolvedPath(String),
}
