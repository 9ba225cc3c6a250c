//! condswitch - rewrite `if` chains as `switch` or `match`
//!
//! Takes PHP-style source, finds `if` / `elseif` / `else` chains and rewrites
//! them into discriminant dispatch.
//!
//! ## Quick Start
//!
//! ```ignore
//! use condswitch::convert_to_switch;
//!
//! let out = convert_to_switch("<?php if ($x == 1) { echo 'one'; } else { echo 'other'; }")?;
//! // <?php
//! //
//! // switch ($x) {
//! //     case 1:
//! //         echo 'one';
//! //     default:
//! //         echo 'other';
//! // }
//! ```
//!
//! ## Discriminants
//!
//! The first branch decides what the switch dispatches on:
//! - `$x == 1` / `$x === 1` → `switch ($x)`, later comparisons contribute
//!   only their right operand as the key
//! - anything else → `switch (true)` for the whole chain
//!
//! Conditions that are not comparisons become string keys:
//! - `$a && $b` / `$a || $b` → `'($a) and ($b)'`
//! - anything else → the condition's source text
//!
//! The rewrite is syntactic; it does not check that later comparisons test
//! the same subject, and predicate-string keys do not evaluate their
//! condition.

mod ast;
mod parse;
mod pretty;
mod transform;

use thiserror::Error;

// ============ Primary Public API ============

pub use transform::SwitchOptions;

/// Rewrite every `if` chain in `source` as a `switch`
pub fn convert_to_switch(source: &str) -> Result<String, ConvertError> {
    convert_to_switch_with(source, &SwitchOptions::default())
}

/// Rewrite every `if` chain in `source` as a `switch`, with options
pub fn convert_to_switch_with(
    source: &str,
    options: &SwitchOptions,
) -> Result<String, ConvertError> {
    let program = parse::parse(source)?;
    let rewritten = transform::rewrite(program, options);
    Ok(pretty::pretty(&rewritten))
}

/// Rewrite the first `if` chain in `source` as a `match` expression.
///
/// Returns only the match statement, not the rest of the program.
pub fn convert_to_match(source: &str) -> Result<String, ConvertError> {
    let program = parse::parse(source)?;
    let stmt = transform::build_match(&program)?;
    Ok(pretty::pretty_stmt(&stmt))
}

// ============ Errors ============

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Parse error: {0}")]
    Parse(#[from] parse::ParseError),
    #[error("No if statement found")]
    NoConditionalFound,
    #[error("Unsupported branch shape in branch {branch}: {reason}")]
    UnsupportedBranchShape { branch: usize, reason: String },
}

pub use parse::ParseError;

// ============ Advanced: Tree Access ============

/// Syntax tree, parser, printer and the individual transform stages
pub mod advanced {
    pub use crate::ast::{
        BinOp, Case, Comment, Else, ElseIf, Expr, If, Literal, Match, MatchArm, Program, Quote,
        Stmt, StmtKind, StrLit, Switch, UnaryOp,
    };
    pub use crate::parse::{parse, parse_expr};
    pub use crate::pretty::{pretty, pretty_stmt};
    pub use crate::transform::{
        Branch, Condition, ConditionalChain, DefaultBranch, Discriminant, EqualityOp, LogicalOp,
        Resolution, build_match, build_switch, flatten_chain, resolve, rewrite, textualize,
    };
}
