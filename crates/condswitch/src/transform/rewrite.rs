//! Whole-tree rewrite of `if` chains into `switch` statements
//!
//! A single bottom-up pass that rebuilds the tree: bodies are rewritten
//! before the statement that owns them, so a chain nested in a branch is
//! already a switch by the time its parent is replaced.

use crate::ast::stmt::{Case, Program, Stmt, StmtKind, Switch};

use super::flatten::flatten_chain;
use super::switch::{SwitchOptions, build_switch};

/// Replace every `if` chain in the program with its switch
pub fn rewrite(program: Program, options: &SwitchOptions) -> Program {
    Program {
        open_tag: program.open_tag,
        stmts: rewrite_stmts(program.stmts, options),
    }
}

fn rewrite_stmts(stmts: Vec<Stmt>, options: &SwitchOptions) -> Vec<Stmt> {
    stmts
        .into_iter()
        .map(|stmt| rewrite_stmt(stmt, options))
        .collect()
}

fn rewrite_stmt(stmt: Stmt, options: &SwitchOptions) -> Stmt {
    let Stmt { comments, kind } = stmt;
    let kind = match kind {
        StmtKind::If(mut if_) => {
            if_.body = rewrite_stmts(if_.body, options);
            for clause in &mut if_.elseifs {
                clause.body = rewrite_stmts(std::mem::take(&mut clause.body), options);
            }
            if let Some(else_) = &mut if_.else_ {
                else_.body = rewrite_stmts(std::mem::take(&mut else_.body), options);
            }

            let chain = flatten_chain(if_);
            let branches = chain.branches.len();
            let has_default = chain.default.is_some();
            let switch = build_switch(chain, options);
            log::debug!(
                "rewrote if chain as switch ({}): {} branch(es){}",
                switch.subject,
                branches,
                if has_default { " + default" } else { "" }
            );
            StmtKind::Switch(switch)
        }
        StmtKind::Block(body) => StmtKind::Block(rewrite_stmts(body, options)),
        StmtKind::While { cond, body } => StmtKind::While {
            cond,
            body: rewrite_stmts(body, options),
        },
        StmtKind::Switch(Switch { subject, cases }) => StmtKind::Switch(Switch {
            subject,
            cases: cases
                .into_iter()
                .map(|case| Case {
                    body: rewrite_stmts(case.body, options),
                    ..case
                })
                .collect(),
        }),
        unchanged @ (StmtKind::Echo(_)
        | StmtKind::Expr(_)
        | StmtKind::Return(_)
        | StmtKind::Break
        | StmtKind::Continue
        | StmtKind::Nop) => unchanged,
    };
    // Comments that led the `if` now lead the switch
    Stmt { comments, kind }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Comment, Expr};
    use crate::parse::parse;

    fn rewrite_source(source: &str) -> Program {
        rewrite(parse(source).unwrap(), &SwitchOptions::default())
    }

    fn as_switch(stmt: &Stmt) -> &Switch {
        match &stmt.kind {
            StmtKind::Switch(switch) => switch,
            other => panic!("Expected switch, got {:?}", other),
        }
    }

    #[test]
    fn rewrite_without_conditionals_is_identity() {
        let source = "<?php $a = 1; while ($a < 3) { echo $a; $a = $a + 1; }";
        let program = parse(source).unwrap();
        assert_eq!(rewrite(program.clone(), &SwitchOptions::default()), program);
    }

    #[test]
    fn rewrite_replaces_every_chain() {
        let program = rewrite_source(
            "if ($x == 1) { echo 'a'; }
            echo 'between';
            while (true) { if ($y === 'q') { break; } }",
        );
        assert_eq!(program.stmts.len(), 3);
        assert_eq!(as_switch(&program.stmts[0]).subject, Expr::var("x"));
        let StmtKind::While { body, .. } = &program.stmts[2].kind else {
            panic!("Expected while");
        };
        assert_eq!(as_switch(&body[0]).subject, Expr::var("y"));
    }

    #[test]
    fn rewrite_nested_chain_inside_out() {
        let program = rewrite_source(
            "if ($x == 1) {
                if ($y == 2) { echo 'inner'; } else { echo 'other'; }
            } else {
                echo 'outer';
            }",
        );
        let outer = as_switch(&program.stmts[0]);
        assert_eq!(outer.cases.len(), 2);
        let inner = as_switch(&outer.cases[0].body[0]);
        assert_eq!(inner.subject, Expr::var("y"));
        assert_eq!(inner.cases[1].key, None);
    }

    #[test]
    fn rewrite_reaches_into_existing_switch_cases() {
        let program = rewrite_source(
            "switch ($m) { case 1: if ($n == 3) { echo 'x'; } break; }",
        );
        let outer = as_switch(&program.stmts[0]);
        assert_eq!(outer.subject, Expr::var("m"));
        assert_eq!(as_switch(&outer.cases[0].body[0]).subject, Expr::var("n"));
    }

    #[test]
    fn rewrite_moves_statement_comments_to_switch() {
        let program = rewrite_source("// pick one\n/* really */\nif ($a == 1) { echo 1; }");
        let stmt = &program.stmts[0];
        assert_eq!(
            stmt.comments,
            vec![Comment::new("// pick one"), Comment::new("/* really */")]
        );
        assert!(as_switch(stmt).cases[0].comments.is_empty());
    }
}
