//! Expressions

use super::{BinOp, Comment, Literal, UnaryOp};

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Variable: `$x` (name stored without the `$`)
    Variable(String),

    /// Bare name: function names, constants
    Name(String),

    /// Literal value
    Literal(Literal),

    /// Short array: `[a, b, c]`
    Array(Vec<Expr>),

    /// Binary operation: `a + b`, `a == b`, `a && b`
    Binary(Box<Expr>, BinOp, Box<Expr>),

    /// Unary operation: `-x`, `!x`
    Unary(UnaryOp, Box<Expr>),

    /// Assignment: `$a = b`
    Assign(Box<Expr>, Box<Expr>),

    /// Ternary: `c ? a : b`
    Ternary(Box<Expr>, Box<Expr>, Box<Expr>),

    /// Call: `f(args...)`
    Call(Box<Expr>, Vec<Expr>),

    /// Index: `a[i]`
    Index(Box<Expr>, Box<Expr>),

    /// Property fetch: `$a->name`
    Property(Box<Expr>, String),

    /// Match expression
    Match(Box<Match>),
}

/// `match (subject) { arms }`
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub subject: Expr,
    pub arms: Vec<MatchArm>,
}

/// One arm of a match. `conds: None` is the `default` arm.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchArm {
    pub comments: Vec<Comment>,
    pub conds: Option<Vec<Expr>>,
    pub body: Expr,
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Variable(name.into())
    }

    pub fn name(name: impl Into<String>) -> Self {
        Expr::Name(name.into())
    }

    pub fn int(n: i64) -> Self {
        Expr::Literal(Literal::Int(n))
    }

    pub fn string(text: &str) -> Self {
        Expr::Literal(Literal::string(text))
    }

    pub fn bool(b: bool) -> Self {
        Expr::Literal(Literal::Bool(b))
    }

    pub fn binop(self, op: BinOp, rhs: Expr) -> Self {
        Expr::Binary(Box::new(self), op, Box::new(rhs))
    }

    pub fn call(self, args: Vec<Expr>) -> Self {
        Expr::Call(Box::new(self), args)
    }

    /// Binding strength of this node when it appears as an operand
    pub fn precedence(&self) -> u8 {
        match self {
            Expr::Assign(..) => 1,
            Expr::Ternary(..) => 2,
            Expr::Binary(_, op, _) => op.precedence(),
            Expr::Unary(..) => 11,
            Expr::Call(..) | Expr::Index(..) | Expr::Property(..) => 12,
            Expr::Variable(_)
            | Expr::Name(_)
            | Expr::Literal(_)
            | Expr::Array(_)
            | Expr::Match(_) => 13,
        }
    }
}
