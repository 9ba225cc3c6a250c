//! Syntax tree for the PHP-style source that condswitch rewrites
//!
//! Split into:
//! - `expr`: expressions (conditions, case keys, operands)
//! - `stmt`: statements, conditional chains, switch and match constructs

pub mod expr;
pub mod stmt;

pub use expr::{Expr, Match, MatchArm};
pub use stmt::{Case, Else, ElseIf, If, Program, Stmt, StmtKind, Switch};

// Shared leaf types used by both expressions and statements

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(StrLit),
    Bool(bool),
    Null,
}

impl Literal {
    /// Build a single-quoted string literal from unescaped text
    pub fn string(text: &str) -> Self {
        let mut raw = String::with_capacity(text.len());
        for c in text.chars() {
            if c == '\'' || c == '\\' {
                raw.push('\\');
            }
            raw.push(c);
        }
        Literal::String(StrLit {
            raw,
            quote: Quote::Single,
        })
    }
}

/// A string literal as written in the source.
///
/// `raw` is the text between the quotes, escapes untouched, so parsed
/// strings print back exactly as they were read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrLit {
    pub raw: String,
    pub quote: Quote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    Single,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Concat,

    // Equality
    Equal,
    Identical,
    NotEqual,
    NotIdentical,

    // Relational
    Lt,
    Le,
    Gt,
    Ge,

    // Logical
    And,
    Or,
}

impl BinOp {
    /// Binding strength, higher binds tighter
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::Or => 4,
            BinOp::And => 5,
            BinOp::Equal | BinOp::Identical | BinOp::NotEqual | BinOp::NotIdentical => 6,
            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => 7,
            BinOp::Concat => 8,
            BinOp::Add | BinOp::Sub => 9,
            BinOp::Mul | BinOp::Div | BinOp::Mod => 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

/// A source comment, stored verbatim including its delimiters
/// (`// …`, `# …` or `/* … */`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment(pub String);

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Comment(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }
}
