//! AST evaluation against the record currently in scope.

use crate::ast::{BinOp, Node};
use crate::error::EvalError;

/// Resolution context for identifier paths: the record being decoded.
///
/// `resolve` walks `path` through nested record fields and returns the
/// integer value of the field it reaches, or `None` when any step is
/// unknown, descends through a non-record value, or lands on a field with
/// no integer form.
pub trait Scope {
    fn resolve(&self, path: &[&str]) -> Option<i64>;
}

/// Evaluates `node` against `scope` to a signed 64-bit integer.
///
/// Children evaluate left before right. Shifts are logical (performed in
/// the unsigned 64-bit domain, count taken modulo 64), `&^` is
/// `lhs & !rhs`, arithmetic wraps, and comparisons yield 1 or 0.
pub fn eval(scope: &dyn Scope, node: &Node) -> Result<i64, EvalError> {
    match node {
        Node::Const(v) => Ok(*v),
        Node::Ident(path) => {
            let steps: Vec<&str> = path.iter().map(String::as_str).collect();
            scope
                .resolve(&steps)
                .ok_or_else(|| EvalError::UnresolvedPath(path.join(".")))
        }
        Node::Binary { op, lhs, rhs } => {
            let l = eval(scope, lhs)?;
            let r = eval(scope, rhs)?;
            Ok(apply(*op, l, r))
        }
    }
}

fn apply(op: BinOp, l: i64, r: i64) -> i64 {
    match op {
        BinOp::Shl => (l as u64).wrapping_shl(r as u32) as i64,
        BinOp::Shr => (l as u64).wrapping_shr(r as u32) as i64,
        BinOp::And => l & r,
        BinOp::AndNot => l & !r,
        BinOp::Add => l.wrapping_add(r),
        BinOp::Sub => l.wrapping_sub(r),
        BinOp::Mul => l.wrapping_mul(r),
        BinOp::Eq => (l == r) as i64,
        BinOp::Ne => (l != r) as i64,
        BinOp::Lt => (l < r) as i64,
        BinOp::Le => (l <= r) as i64,
        BinOp::Gt => (l > r) as i64,
        BinOp::Ge => (l >= r) as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    /// Two-level scope with `Length = 3` and `Sub.Something = 10`.
    struct TestScope;

    impl Scope for TestScope {
        fn resolve(&self, path: &[&str]) -> Option<i64> {
            match path {
                ["Length"] => Some(3),
                ["Sub", "Something"] => Some(10),
                _ => None,
            }
        }
    }

    fn run(text: &str) -> i64 {
        eval(&TestScope, &parse(text).unwrap()).unwrap()
    }

    #[test]
    fn constants_and_arithmetic() {
        assert_eq!(run("1"), 1);
        assert_eq!(run("1+2"), 3);
        assert_eq!(run("(3*4)+2"), 14);
        assert_eq!(run("10-4"), 6);
    }

    #[test]
    fn shifts_are_logical() {
        assert_eq!(run("1<<4"), 16);
        assert_eq!(run("0x10>>2"), 4);
        // Shifting a value with the sign bit set does not smear the sign.
        let node = parse("Length>>1").unwrap();
        struct Neg;
        impl Scope for Neg {
            fn resolve(&self, path: &[&str]) -> Option<i64> {
                matches!(path, ["Length"]).then_some(-1)
            }
        }
        assert_eq!(eval(&Neg, &node).unwrap(), (u64::MAX >> 1) as i64);
    }

    #[test]
    fn and_not_rounds_alignment() {
        assert_eq!(run("(Length+3)&^3"), 4);
        assert_eq!(run("((Length-1)+3)&^3"), 4);
        assert_eq!(run("6&^3"), 4);
    }

    #[test]
    fn comparisons_yield_one_or_zero() {
        assert_eq!(run("Length == 3"), 1);
        assert_eq!(run("Length == 4"), 0);
        assert_eq!(run("Length != 3"), 0);
        assert_eq!(run("Length < 4"), 1);
        assert_eq!(run("Length <= 3"), 1);
        assert_eq!(run("Length > 3"), 0);
        assert_eq!(run("Length >= 3"), 1);
    }

    #[test]
    fn dotted_paths_resolve_through_records() {
        assert_eq!(run("Sub.Something"), 10);
        assert_eq!(run("Sub.Something + Length"), 13);
    }

    #[test]
    fn unresolved_path_errors() {
        let node = parse("Sub.Missing").unwrap();
        assert_eq!(
            eval(&TestScope, &node),
            Err(EvalError::UnresolvedPath("Sub.Missing".into()))
        );
    }

    #[test]
    fn left_child_evaluates_before_right() {
        use std::cell::RefCell;
        struct Recording(RefCell<Vec<String>>);
        impl Scope for Recording {
            fn resolve(&self, path: &[&str]) -> Option<i64> {
                self.0.borrow_mut().push(path.join("."));
                Some(0)
            }
        }
        let scope = Recording(RefCell::new(Vec::new()));
        eval(&scope, &parse("A - B").unwrap()).unwrap();
        assert_eq!(*scope.0.borrow(), vec!["A".to_string(), "B".to_string()]);
    }
}
