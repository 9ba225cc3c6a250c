//! Discriminant resolution
//!
//! Decides, branch by branch, whether a condition reduces to
//! `discriminant == key` or has to be encoded as a predicate string matched
//! against a constant `true`.

use crate::ast::{BinOp, Expr};

/// The shapes of condition the resolver distinguishes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition<'a> {
    /// `left == right` or `left === right`.
    ///
    /// Both operators resolve the same way; `op` only records which one was
    /// written.
    Comparison {
        op: EqualityOp,
        left: &'a Expr,
        right: &'a Expr,
    },
    /// `left && right` or `left || right`
    Logical {
        op: LogicalOp,
        left: &'a Expr,
        right: &'a Expr,
    },
    /// Anything else, never decomposed
    Opaque(&'a Expr),
}

/// Equality operator of a comparison, kept for classification only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqualityOp {
    Equal,
    Identical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    /// The operator word used in synthesized predicates
    pub fn word(self) -> &'static str {
        match self {
            LogicalOp::And => "and",
            LogicalOp::Or => "or",
        }
    }
}

impl<'a> Condition<'a> {
    pub fn of(expr: &'a Expr) -> Self {
        match expr {
            Expr::Binary(left, BinOp::Equal, right) => Condition::Comparison {
                op: EqualityOp::Equal,
                left,
                right,
            },
            Expr::Binary(left, BinOp::Identical, right) => Condition::Comparison {
                op: EqualityOp::Identical,
                left,
                right,
            },
            Expr::Binary(left, BinOp::And, right) => Condition::Logical {
                op: LogicalOp::And,
                left,
                right,
            },
            Expr::Binary(left, BinOp::Or, right) => Condition::Logical {
                op: LogicalOp::Or,
                left,
                right,
            },
            other => Condition::Opaque(other),
        }
    }
}

/// The expression a switch dispatches on
#[derive(Debug, Clone, PartialEq)]
pub enum Discriminant {
    /// Left operand of the first comparison in the chain
    Subject(Expr),
    /// No branch was a comparison: dispatch on the constant `true`
    Truthy,
}

impl Discriminant {
    pub fn into_expr(self) -> Expr {
        match self {
            Discriminant::Subject(expr) => expr,
            Discriminant::Truthy => Expr::bool(true),
        }
    }
}

/// A discriminant shared by the chain plus one case key per branch
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub discriminant: Discriminant,
    pub keys: Vec<Expr>,
}

/// Resolve the conditions of a chain, left to right.
///
/// The first branch fixes the discriminant for the whole chain. A comparison
/// adopts its left operand; any other condition commits the chain to `true`,
/// and later comparisons can no longer replace it. Every comparison
/// contributes its right operand as the key, whether or not its left operand
/// is the adopted discriminant: `if ($x == 1) … elseif ($y == 2)` dispatches
/// on `$x` with keys `1` and `2`. Other conditions become predicate-string
/// keys.
pub fn resolve<'a>(conditions: impl IntoIterator<Item = &'a Expr>) -> Resolution {
    let mut discriminant: Option<Discriminant> = None;
    let keys = conditions
        .into_iter()
        .map(|condition| match Condition::of(condition) {
            Condition::Comparison { left, right, .. } => {
                discriminant.get_or_insert_with(|| Discriminant::Subject(left.clone()));
                right.clone()
            }
            Condition::Logical { op, left, right } => {
                discriminant.get_or_insert(Discriminant::Truthy);
                let predicate = combine(op, left, right);
                log::trace!("logical condition falls back to predicate key {predicate:?}");
                Expr::string(&predicate)
            }
            Condition::Opaque(expr) => {
                discriminant.get_or_insert(Discriminant::Truthy);
                let predicate = render(expr);
                log::trace!("opaque condition falls back to predicate key {predicate:?}");
                Expr::string(&predicate)
            }
        })
        .collect();

    Resolution {
        discriminant: discriminant.unwrap_or(Discriminant::Truthy),
        keys,
    }
}

/// Render a condition as predicate text.
///
/// `&&`/`||` become `(<left>) and|or (<right>)`, recursively; any other
/// expression is printed as written.
pub fn textualize(expr: &Expr) -> String {
    match Condition::of(expr) {
        Condition::Logical { op, left, right } => combine(op, left, right),
        Condition::Comparison { .. } | Condition::Opaque(_) => render(expr),
    }
}

fn combine(op: LogicalOp, left: &Expr, right: &Expr) -> String {
    format!("({}) {} ({})", textualize(left), op.word(), textualize(right))
}

fn render(expr: &Expr) -> String {
    expr.to_string().trim().to_string()
}
