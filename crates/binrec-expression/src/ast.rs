//! Expression AST.

/// Binary operator tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// `<<` — logical shift left.
    Shl,
    /// `>>` — logical shift right.
    Shr,
    /// `&` — bitwise AND.
    And,
    /// `&^` — AND NOT (`lhs & !rhs`), used for alignment rounding.
    AndNot,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `==` — 1 if equal, else 0.
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

/// An expression node: a constant leaf, a dotted identifier path leaf
/// (`A.B.C`, resolved through nested record fields), or a binary operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Const(i64),
    Ident(Vec<String>),
    Binary {
        op: BinOp,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
}
