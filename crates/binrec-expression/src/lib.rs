//! Directive expression language for binrec schemas.
//!
//! Schema directives (`condition`, `skip`, `length`, `max`, `align`) carry
//! tiny integer expressions evaluated against the record currently being
//! decoded. The grammar is deliberately restricted: constants, dotted
//! identifier paths, and exactly one binary operation per parenthesis
//! level — there is no operator precedence, so nesting requires explicit
//! grouping (`(1+2)+3` parses, `1+2+3` does not).
//!
//! # Example
//!
//! ```
//! use binrec_expression::{eval, parse, Scope};
//!
//! struct Header {
//!     length: i64,
//! }
//!
//! impl Scope for Header {
//!     fn resolve(&self, path: &[&str]) -> Option<i64> {
//!         match path {
//!             ["Length"] => Some(self.length),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let node = parse("(Length+3)&^3").unwrap();
//! let header = Header { length: 3 };
//! assert_eq!(eval(&header, &node).unwrap(), 4);
//! ```

mod ast;
mod error;
mod eval;
mod parser;

pub use ast::{BinOp, Node};
pub use error::{EvalError, ParseError};
pub use eval::{eval, Scope};
pub use parser::parse;
