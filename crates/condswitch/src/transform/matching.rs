//! Build a `match` expression from the first conditional in a program
//!
//! Unlike the switch rewrite there is no shared discriminant: every arm is
//! guarded by its branch's own condition and the subject is `true`. Arms can
//! only hold one expression, so each branch body must be a single `echo`,
//! which becomes `echo(<operands>)`.

use crate::ConvertError;
use crate::ast::expr::{Expr, Match, MatchArm};
use crate::ast::stmt::{If, Program, Stmt, StmtKind};
use crate::ast::Comment;

use super::flatten::{Branch, ConditionalChain, DefaultBranch, flatten_chain};

/// Name of the call that wraps each arm's operands
const WRAPPER: &str = "echo";

/// Build a `match (true) { … };` statement from the first `if` in the program.
///
/// The statement keeps the comments that led the `if`.
pub fn build_match(program: &Program) -> Result<Stmt, ConvertError> {
    let Some((comments, if_)) = find_first_if(&program.stmts) else {
        log::debug!("no conditional found for match conversion");
        return Err(ConvertError::NoConditionalFound);
    };

    let ConditionalChain { branches, default } = flatten_chain(if_.clone());
    let default_index = branches.len();

    let mut arms = Vec::with_capacity(branches.len() + 1);
    for (index, branch) in branches.into_iter().enumerate() {
        let Branch {
            condition,
            body,
            leading_comments,
        } = branch;
        arms.push(build_arm(index, Some(condition), body, leading_comments)?);
    }
    if let Some(DefaultBranch {
        body,
        leading_comments,
    }) = default
    {
        arms.push(build_arm(default_index, None, body, leading_comments)?);
    }

    let match_expr = Match {
        subject: Expr::bool(true),
        arms,
    };
    Ok(Stmt::new(StmtKind::Expr(Expr::Match(Box::new(match_expr)))).with_comments(comments.to_vec()))
}

/// Depth-first, document order: an `if` is found before any `if` nested in it
fn find_first_if(stmts: &[Stmt]) -> Option<(&[Comment], &If)> {
    stmts.iter().find_map(|stmt| match &stmt.kind {
        StmtKind::If(if_) => Some((stmt.comments.as_slice(), if_)),
        StmtKind::Block(body) | StmtKind::While { body, .. } => find_first_if(body),
        StmtKind::Switch(switch) => switch
            .cases
            .iter()
            .find_map(|case| find_first_if(&case.body)),
        StmtKind::Echo(_)
        | StmtKind::Expr(_)
        | StmtKind::Return(_)
        | StmtKind::Break
        | StmtKind::Continue
        | StmtKind::Nop => None,
    })
}

fn build_arm(
    index: usize,
    condition: Option<Expr>,
    body: Vec<Stmt>,
    mut comments: Vec<Comment>,
) -> Result<MatchArm, ConvertError> {
    // Comment-only statements don't count towards the one-statement rule,
    // their comments move onto the arm
    let mut statements = Vec::with_capacity(1);
    for stmt in body {
        if stmt.kind == StmtKind::Nop {
            comments.extend(stmt.comments);
        } else {
            statements.push(stmt);
        }
    }

    let mut statements = statements.into_iter();
    let (Some(stmt), None) = (statements.next(), statements.next()) else {
        return Err(ConvertError::UnsupportedBranchShape {
            branch: index,
            reason: "expected exactly one statement".to_string(),
        });
    };

    let Stmt {
        comments: stmt_comments,
        kind,
    } = stmt;
    let StmtKind::Echo(operands) = kind else {
        return Err(ConvertError::UnsupportedBranchShape {
            branch: index,
            reason: "expected an `echo` statement".to_string(),
        });
    };
    comments.extend(stmt_comments);

    Ok(MatchArm {
        comments,
        conds: condition.map(|c| vec![c]),
        body: Expr::name(WRAPPER).call(operands),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;
    use crate::pretty::pretty_stmt;

    fn match_of(source: &str) -> Result<Stmt, ConvertError> {
        build_match(&parse(source).unwrap())
    }

    fn arms(stmt: &Stmt) -> &[MatchArm] {
        match &stmt.kind {
            StmtKind::Expr(Expr::Match(m)) => &m.arms,
            other => panic!("Expected match statement, got {:?}", other),
        }
    }

    #[test]
    fn arms_keep_full_conditions() {
        let stmt = match_of(
            "if ($x == 1 && $y > 0) { echo 'A'; } elseif ($y == 2) { echo 'B', $z; } else { echo 'C'; }",
        )
        .unwrap();
        let arms = arms(&stmt);
        assert_eq!(arms.len(), 3);
        assert_eq!(
            arms[0].conds.as_ref().unwrap()[0].to_string(),
            "$x == 1 && $y > 0"
        );
        assert_eq!(arms[1].body.to_string(), "echo('B', $z)");
        assert_eq!(arms[2].conds, None);
        assert_eq!(arms[2].body.to_string(), "echo('C')");
    }

    #[test]
    fn no_conditional_is_reported() {
        let err = match_of("<?php echo 'hi';").unwrap_err();
        assert!(matches!(err, ConvertError::NoConditionalFound));
    }

    #[test]
    fn only_the_first_conditional_is_used() {
        let stmt = match_of(
            "while ($go) { if ($a) { echo 1; } } if ($b) { echo 2; } elseif ($c) { echo 3; }",
        )
        .unwrap();
        assert_eq!(arms(&stmt).len(), 1);
        assert_eq!(
            pretty_stmt(&stmt),
            "match (true) {\n    $a => echo(1),\n};\n"
        );
    }

    #[test]
    fn multi_statement_body_is_rejected() {
        let err = match_of("if ($a) { echo 1; } else { echo 2; echo 3; }").unwrap_err();
        match err {
            ConvertError::UnsupportedBranchShape { branch, .. } => assert_eq!(branch, 1),
            other => panic!("Expected UnsupportedBranchShape, got {:?}", other),
        }
    }

    #[test]
    fn empty_body_is_rejected() {
        let err = match_of("if ($a) { }").unwrap_err();
        assert!(matches!(
            err,
            ConvertError::UnsupportedBranchShape { branch: 0, .. }
        ));
    }

    #[test]
    fn non_echo_body_is_rejected() {
        let err = match_of("if ($a) { return 1; }").unwrap_err();
        assert!(matches!(
            err,
            ConvertError::UnsupportedBranchShape { branch: 0, ref reason } if reason.contains("echo")
        ));
    }

    #[test]
    fn comments_move_onto_arms() {
        let stmt = match_of(
            "// chain
            if ($a) {
                // say one
                echo 1;
            }
            // second
            elseif ($b) {
                echo 2;
                // trailing
            }",
        )
        .unwrap();
        assert_eq!(stmt.comments, vec![Comment::new("// chain")]);
        let arms = arms(&stmt);
        assert_eq!(arms[0].comments, vec![Comment::new("// say one")]);
        assert_eq!(
            arms[1].comments,
            vec![Comment::new("// second"), Comment::new("// trailing")]
        );
    }
}
