//! Flatten an `if` / `elseif` / `else` node into an ordered branch list

use crate::ast::stmt::{Else, ElseIf, If, Stmt};
use crate::ast::{Comment, Expr};

/// One condition/body pair of a chain, in source order
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub condition: Expr,
    pub body: Vec<Stmt>,
    pub leading_comments: Vec<Comment>,
}

/// The trailing `else` of a chain
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultBranch {
    pub body: Vec<Stmt>,
    pub leading_comments: Vec<Comment>,
}

/// A conditional chain: branches are never empty and stay in source order
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalChain {
    pub branches: Vec<Branch>,
    pub default: Option<DefaultBranch>,
}

/// Flatten a conditional node into its chain.
///
/// The outer `if` is the first branch, each `elseif` follows in order, and a
/// plain `else` terminates the chain as its default. Comments that lead the
/// `if` statement itself stay with the statement; the first branch carries
/// none of its own.
pub fn flatten_chain(if_: If) -> ConditionalChain {
    let If {
        cond,
        body,
        elseifs,
        else_,
    } = if_;

    let mut branches = Vec::with_capacity(1 + elseifs.len());
    branches.push(Branch {
        condition: cond,
        body,
        leading_comments: Vec::new(),
    });
    branches.extend(elseifs.into_iter().map(
        |ElseIf {
             comments,
             cond,
             body,
         }| Branch {
            condition: cond,
            body,
            leading_comments: comments,
        },
    ));

    let default = else_.map(|Else { comments, body }| DefaultBranch {
        body,
        leading_comments: comments,
    });

    ConditionalChain { branches, default }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::StmtKind;
    use crate::parse::parse;

    fn first_if(source: &str) -> If {
        let program = parse(source).unwrap();
        match program.stmts.into_iter().next().map(|s| s.kind) {
            Some(StmtKind::If(if_)) => if_,
            other => panic!("Expected if, got {:?}", other),
        }
    }

    #[test]
    fn flatten_single_branch() {
        let chain = flatten_chain(first_if("if ($a) { echo 1; }"));
        assert_eq!(chain.branches.len(), 1);
        assert!(chain.default.is_none());
        assert_eq!(chain.branches[0].condition, Expr::var("a"));
    }

    #[test]
    fn flatten_keeps_source_order_and_default() {
        let chain = flatten_chain(first_if(
            "if ($x == 1) { echo 'a'; } elseif ($x == 2) { echo 'b'; } elseif ($x == 3) { } else { echo 'c'; }",
        ));
        let conditions: Vec<String> = chain
            .branches
            .iter()
            .map(|b| b.condition.to_string())
            .collect();
        assert_eq!(conditions, ["$x == 1", "$x == 2", "$x == 3"]);
        assert!(chain.branches[2].body.is_empty());
        let default = chain.default.unwrap();
        assert_eq!(default.body, vec![Stmt::echo(vec![Expr::string("c")])]);
    }

    #[test]
    fn flatten_carries_clause_comments() {
        let chain = flatten_chain(first_if(
            "if ($a) { echo 1; }
            // two
            // more
            elseif ($b) { echo 2; }
            /* fallback */
            else { echo 3; }",
        ));
        assert!(chain.branches[0].leading_comments.is_empty());
        assert_eq!(
            chain.branches[1].leading_comments,
            vec![Comment::new("// two"), Comment::new("// more")]
        );
        assert_eq!(
            chain.default.unwrap().leading_comments,
            vec![Comment::new("/* fallback */")]
        );
    }

    #[test]
    fn flatten_else_if_is_a_plain_default() {
        let chain = flatten_chain(first_if("if ($a) echo 1; else if ($b) echo 2;"));
        assert_eq!(chain.branches.len(), 1);
        let default = chain.default.unwrap();
        assert!(matches!(default.body[0].kind, StmtKind::If(_)));
    }
}
