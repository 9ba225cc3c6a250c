//! Statements
//!
//! Comments live on the node they lead: a statement, an `elseif`/`else`
//! clause, a switch `case`, or a match arm.

use super::{Comment, Expr};

/// A parsed source file
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Whether the source opened with `<?php`
    pub open_tag: bool,
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub comments: Vec<Comment>,
    pub kind: StmtKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `echo a, b;`
    Echo(Vec<Expr>),

    /// Expression statement: `f($x);`
    Expr(Expr),

    /// `return;` / `return expr;`
    Return(Option<Expr>),

    Break,

    Continue,

    /// `{ ... }`
    Block(Vec<Stmt>),

    If(If),

    /// `while (cond) { ... }`
    While { cond: Expr, body: Vec<Stmt> },

    Switch(Switch),

    /// Holds comments that lead nothing (e.g. before a closing brace)
    Nop,
}

/// `if (cond) { body } elseif ... else ...`
#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub cond: Expr,
    pub body: Vec<Stmt>,
    pub elseifs: Vec<ElseIf>,
    pub else_: Option<Else>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElseIf {
    pub comments: Vec<Comment>,
    pub cond: Expr,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Else {
    pub comments: Vec<Comment>,
    pub body: Vec<Stmt>,
}

/// `switch (subject) { cases }`
#[derive(Debug, Clone, PartialEq)]
pub struct Switch {
    pub subject: Expr,
    pub cases: Vec<Case>,
}

/// One `case key:` (or `default:` when `key` is `None`)
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub comments: Vec<Comment>,
    pub key: Option<Expr>,
    pub body: Vec<Stmt>,
}

impl Stmt {
    pub fn new(kind: StmtKind) -> Self {
        Stmt {
            comments: Vec::new(),
            kind,
        }
    }

    pub fn with_comments(mut self, comments: Vec<Comment>) -> Self {
        self.comments = comments;
        self
    }

    pub fn echo(operands: Vec<Expr>) -> Self {
        Stmt::new(StmtKind::Echo(operands))
    }

    /// Whether control cannot fall off the end of this statement
    pub fn is_jump(&self) -> bool {
        matches!(
            self.kind,
            StmtKind::Break | StmtKind::Continue | StmtKind::Return(_)
        )
    }
}
