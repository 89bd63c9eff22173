//! Recursive-descent parser for the directive grammar.
//!
//! ```text
//! Expression   = (Op | Grouping) EndOfInput
//! Op           = Grouping <operator> Grouping
//! Grouping     = Spacing? ( '(' Op ')' | Constant | DotIdentifier ) Spacing?
//! DotIdentifier= Identifier ('.' Identifier)*
//! Identifier   = UpperAlpha (Alnum | '_')*
//! Constant     = '0x' HexDigit+ | Digit+
//! ```
//!
//! There is no operator precedence: each parenthesis level holds at most one
//! binary operation, and a parenthesized unit must contain one. Operator
//! tokens are matched in a fixed order with two-character tokens ahead of
//! their one-character prefixes, so `>>` wins over `>` and `&^` over `&`,
//! reproducing the ordered choice of the reference grammar.

use crate::ast::{BinOp, Node};
use crate::error::ParseError;

const OPERATORS: &[(&str, BinOp)] = &[
    (">>", BinOp::Shr),
    ("<<", BinOp::Shl),
    ("&^", BinOp::AndNot),
    ("==", BinOp::Eq),
    ("!=", BinOp::Ne),
    ("<=", BinOp::Le),
    (">=", BinOp::Ge),
    ("&", BinOp::And),
    ("+", BinOp::Add),
    ("-", BinOp::Sub),
    ("*", BinOp::Mul),
    ("<", BinOp::Lt),
    (">", BinOp::Gt),
];

/// Parses expression text into an AST. Pure function of the input.
pub fn parse(text: &str) -> Result<Node, ParseError> {
    let mut p = Parser {
        text: text.as_bytes(),
        pos: 0,
    };
    let node = p.expression()?;
    if p.pos != p.text.len() {
        return Err(p.err("end of input"));
    }
    Ok(node)
}

struct Parser<'a> {
    text: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn err(&self, expected: &'static str) -> ParseError {
        self.err_at(self.pos, expected)
    }

    fn err_at(&self, offset: usize, expected: &'static str) -> ParseError {
        let offset = offset.min(self.text.len());
        ParseError {
            expected,
            offset,
            remainder: String::from_utf8_lossy(&self.text[offset..]).into_owned(),
        }
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.text.get(self.pos).copied()
    }

    fn spacing(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Top level: a lone grouping, or exactly one binary operation.
    fn expression(&mut self) -> Result<Node, ParseError> {
        let lhs = self.grouping()?;
        if self.pos == self.text.len() {
            return Ok(lhs);
        }
        let op = match self.operator() {
            Some(op) => op,
            None => return Err(self.err("operator or end of input")),
        };
        let rhs = self.grouping()?;
        Ok(Node::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    /// Inside parentheses a binary operation is mandatory: `(1)` does not
    /// parse, `(1+2)` does.
    fn binary(&mut self) -> Result<Node, ParseError> {
        let lhs = self.grouping()?;
        let op = match self.operator() {
            Some(op) => op,
            None => return Err(self.err("operator")),
        };
        let rhs = self.grouping()?;
        Ok(Node::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    fn grouping(&mut self) -> Result<Node, ParseError> {
        self.spacing();
        let node = match self.peek() {
            Some(b'(') => {
                self.pos += 1;
                let inner = self.binary()?;
                if self.peek() != Some(b')') {
                    return Err(self.err("')'"));
                }
                self.pos += 1;
                inner
            }
            Some(b'0'..=b'9') => self.constant()?,
            Some(c) if c.is_ascii_uppercase() => self.dot_identifier()?,
            _ => return Err(self.err("constant, identifier, or '('")),
        };
        self.spacing();
        Ok(node)
    }

    fn operator(&mut self) -> Option<BinOp> {
        let rest = &self.text[self.pos..];
        for (token, op) in OPERATORS {
            if rest.starts_with(token.as_bytes()) {
                self.pos += token.len();
                return Some(*op);
            }
        }
        None
    }

    fn constant(&mut self) -> Result<Node, ParseError> {
        let start = self.pos;
        if self.peek() == Some(b'0') && self.text.get(self.pos + 1) == Some(&b'x') {
            self.pos += 2;
            let digits = self.take_while(|c| c.is_ascii_hexdigit());
            if digits.is_empty() {
                return Err(self.err("hex digits"));
            }
            return i64::from_str_radix(&digits, 16)
                .map(Node::Const)
                .map_err(|_| self.err_at(start, "constant in 64-bit range"));
        }
        let digits = self.take_while(|c| c.is_ascii_digit());
        digits
            .parse::<i64>()
            .map(Node::Const)
            .map_err(|_| self.err_at(start, "constant in 64-bit range"))
    }

    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> String {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if pred(c)) {
            self.pos += 1;
        }
        self.text[start..self.pos]
            .iter()
            .map(|&b| b as char)
            .collect()
    }

    fn dot_identifier(&mut self) -> Result<Node, ParseError> {
        let mut path = vec![self.identifier()?];
        while self.peek() == Some(b'.') {
            self.pos += 1;
            path.push(self.identifier()?);
        }
        Ok(Node::Ident(path))
    }

    fn identifier(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Some(c) if c.is_ascii_uppercase() => {}
            _ => return Err(self.err("identifier")),
        }
        Ok(self.take_while(|c| c.is_ascii_alphanumeric() || c == b'_'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(path: &[&str]) -> Node {
        Node::Ident(path.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn parses_constants() {
        assert_eq!(parse("1").unwrap(), Node::Const(1));
        assert_eq!(parse("42").unwrap(), Node::Const(42));
        assert_eq!(parse("0x10").unwrap(), Node::Const(16));
        assert_eq!(parse("0xdeadBEEF").unwrap(), Node::Const(0xdead_beef));
        assert_eq!(parse(" 7 ").unwrap(), Node::Const(7));
    }

    #[test]
    fn parses_identifiers() {
        assert_eq!(parse("Length").unwrap(), ident(&["Length"]));
        assert_eq!(
            parse("Sub.Something").unwrap(),
            ident(&["Sub", "Something"])
        );
        assert_eq!(parse("A.B.C_2").unwrap(), ident(&["A", "B", "C_2"]));
    }

    #[test]
    fn parses_single_binary_op() {
        assert_eq!(
            parse("1+2").unwrap(),
            Node::Binary {
                op: BinOp::Add,
                lhs: Box::new(Node::Const(1)),
                rhs: Box::new(Node::Const(2)),
            }
        );
        assert_eq!(
            parse("Length == 3").unwrap(),
            Node::Binary {
                op: BinOp::Eq,
                lhs: Box::new(ident(&["Length"])),
                rhs: Box::new(Node::Const(3)),
            }
        );
    }

    #[test]
    fn two_char_tokens_win_over_prefixes() {
        assert!(matches!(
            parse("1>>2").unwrap(),
            Node::Binary { op: BinOp::Shr, .. }
        ));
        assert!(matches!(
            parse("1>2").unwrap(),
            Node::Binary { op: BinOp::Gt, .. }
        ));
        assert!(matches!(
            parse("1&^2").unwrap(),
            Node::Binary {
                op: BinOp::AndNot,
                ..
            }
        ));
        assert!(matches!(
            parse("1&2").unwrap(),
            Node::Binary { op: BinOp::And, .. }
        ));
        assert!(matches!(
            parse("1<=2").unwrap(),
            Node::Binary { op: BinOp::Le, .. }
        ));
    }

    #[test]
    fn nesting_requires_parentheses() {
        // No implicit precedence: a second operator is unparsed input.
        let err = parse("1+2+3").unwrap_err();
        assert_eq!(err.remainder, "+3");

        let node = parse("(1+2)+3").unwrap();
        assert_eq!(
            node,
            Node::Binary {
                op: BinOp::Add,
                lhs: Box::new(Node::Binary {
                    op: BinOp::Add,
                    lhs: Box::new(Node::Const(1)),
                    rhs: Box::new(Node::Const(2)),
                }),
                rhs: Box::new(Node::Const(3)),
            }
        );
    }

    #[test]
    fn parenthesized_unit_must_be_binary() {
        assert!(parse("(1)").is_err());
        assert!(parse("((Length-1)+3)&^3").is_ok());
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse("").is_err());
        assert!(parse("lower").is_err());
        assert!(parse("1 2").is_err());
        assert!(parse("(1+2").is_err());
        assert!(parse("0x").is_err());
        assert!(parse("A.").is_err());
        assert!(parse("-1").is_err());
        assert!(parse("Sub .Something").is_err());
    }

    #[test]
    fn error_reports_remainder() {
        let err = parse("Length ? 3").unwrap_err();
        assert_eq!(err.offset, 7);
        assert_eq!(err.remainder, "? 3");
        assert_eq!(err.expected, "operator or end of input");
    }
}
