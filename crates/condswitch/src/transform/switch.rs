//! Build a `switch` statement from a flattened chain

use crate::ast::stmt::{Case, Stmt, StmtKind, Switch};

use super::flatten::{Branch, ConditionalChain, DefaultBranch};
use super::resolve::resolve;

/// Options for the switch rewrite
#[derive(Debug, Clone, Default)]
pub struct SwitchOptions {
    /// Append `break;` to every non-default case that does not already end
    /// in `break`, `continue` or `return`
    pub terminate_cases: bool,
}

impl SwitchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_terminate_cases(mut self, terminate: bool) -> Self {
        self.terminate_cases = terminate;
        self
    }
}

/// Assemble the switch for a chain.
///
/// One case per branch in source order, keyed by the resolver, then the
/// default case (if any) last.
pub fn build_switch(chain: ConditionalChain, options: &SwitchOptions) -> Switch {
    let ConditionalChain { branches, default } = chain;
    let resolution = resolve(branches.iter().map(|b| &b.condition));

    let mut cases: Vec<Case> = branches
        .into_iter()
        .zip(resolution.keys)
        .map(
            |(
                Branch {
                    body,
                    leading_comments,
                    ..
                },
                key,
            )| Case {
                comments: leading_comments,
                key: Some(key),
                body,
            },
        )
        .collect();

    if options.terminate_cases {
        for case in &mut cases {
            terminate(&mut case.body);
        }
    }

    if let Some(DefaultBranch {
        body,
        leading_comments,
    }) = default
    {
        cases.push(Case {
            comments: leading_comments,
            key: None,
            body,
        });
    }

    Switch {
        subject: resolution.discriminant.into_expr(),
        cases,
    }
}

fn terminate(body: &mut Vec<Stmt>) {
    let ends_in_jump = body
        .iter()
        .rev()
        .find(|stmt| stmt.kind != StmtKind::Nop)
        .is_some_and(Stmt::is_jump);
    if !ends_in_jump {
        body.push(Stmt::new(StmtKind::Break));
    }
}
