//! Pretty printing for the syntax tree
//!
//! `Display` renders expressions on a single line with the minimum of
//! parentheses. `pretty` lays out whole programs: four-space indentation,
//! braces on the opening line, comments on their own line ahead of the node
//! they lead.

use crate::ast::expr::{Expr, Match, MatchArm};
use crate::ast::stmt::{Case, If, Program, Stmt, StmtKind, Switch};
use crate::ast::{BinOp, Comment, Literal, Quote, UnaryOp};
use std::fmt::{self, Display, Write};

const INDENT: &str = "    ";

// ============ Display (single-line) ============

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Float(n) => {
                if n.is_finite() && n.fract() == 0.0 {
                    write!(f, "{n:.1}")
                } else {
                    write!(f, "{}", n)
                }
            }
            Literal::String(s) => match s.quote {
                Quote::Single => write!(f, "'{}'", s.raw),
                Quote::Double => write!(f, "\"{}\"", s.raw),
            },
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Null => write!(f, "null"),
        }
    }
}

impl Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Concat => ".",
            BinOp::Equal => "==",
            BinOp::Identical => "===",
            BinOp::NotEqual => "!=",
            BinOp::NotIdentical => "!==",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        };
        write!(f, "{}", s)
    }
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        };
        write!(f, "{}", s)
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Variable(name) => write!(f, "${}", name),
            Expr::Name(name) => write!(f, "{}", name),
            Expr::Literal(lit) => write!(f, "{}", lit),
            Expr::Array(items) => {
                write!(f, "[")?;
                write_list(f, items)?;
                write!(f, "]")
            }
            Expr::Binary(lhs, op, rhs) => {
                let prec = op.precedence();
                // Equality and relational operators do not chain
                let non_assoc = matches!(
                    op,
                    BinOp::Equal
                        | BinOp::Identical
                        | BinOp::NotEqual
                        | BinOp::NotIdentical
                        | BinOp::Lt
                        | BinOp::Le
                        | BinOp::Gt
                        | BinOp::Ge
                );
                write_operand(f, lhs, prec, non_assoc)?;
                write!(f, " {} ", op)?;
                write_operand(f, rhs, prec, true)
            }
            Expr::Unary(op, operand) => {
                write!(f, "{}", op)?;
                write_operand(f, operand, self.precedence(), true)
            }
            Expr::Assign(target, value) => {
                write_operand(f, target, self.precedence(), true)?;
                write!(f, " = ")?;
                write_operand(f, value, self.precedence(), false)
            }
            Expr::Ternary(cond, then, otherwise) => {
                write_operand(f, cond, self.precedence(), true)?;
                write!(f, " ? {} : ", then)?;
                write_operand(f, otherwise, self.precedence(), true)
            }
            Expr::Call(callee, args) => {
                write_operand(f, callee, self.precedence(), false)?;
                write!(f, "(")?;
                write_list(f, args)?;
                write!(f, ")")
            }
            Expr::Index(base, index) => {
                write_operand(f, base, self.precedence(), false)?;
                write!(f, "[{}]", index)
            }
            Expr::Property(base, name) => {
                write_operand(f, base, self.precedence(), false)?;
                write!(f, "->{}", name)
            }
            Expr::Match(m) => {
                write!(f, "match ({}) {{ ", m.subject)?;
                for (i, arm) in m.arms.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", ArmDisplay(arm))?;
                }
                write!(f, " }}")
            }
        }
    }
}

/// Write `expr`, parenthesised when it binds looser than `min` (or equally
/// loose, when `strict`)
fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr, min: u8, strict: bool) -> fmt::Result {
    let prec = expr.precedence();
    if prec < min || (strict && prec == min) {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

struct ArmDisplay<'a>(&'a MatchArm);

impl Display for ArmDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.conds {
            Some(conds) => write_list(f, conds)?,
            None => write!(f, "default")?,
        }
        write!(f, " => {}", self.0.body)
    }
}

// ============ Block layout ============

/// Print a whole program
pub fn pretty(program: &Program) -> String {
    let mut printer = Printer::default();
    if program.open_tag {
        printer.out.push_str("<?php\n\n");
    }
    printer.stmts(&program.stmts);
    printer.out
}

/// Print a single statement (with its comments)
pub fn pretty_stmt(stmt: &Stmt) -> String {
    let mut printer = Printer::default();
    printer.stmt(stmt);
    printer.out
}

#[derive(Default)]
struct Printer {
    out: String,
    depth: usize,
}

impl Printer {
    fn line(&mut self, text: impl Display) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        writeln!(self.out, "{}", text).unwrap();
    }

    fn comments(&mut self, comments: &[Comment]) {
        for comment in comments {
            self.line(comment.text());
        }
    }

    fn indented(&mut self, body: impl FnOnce(&mut Self)) {
        self.depth += 1;
        body(self);
        self.depth -= 1;
    }

    fn stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.stmt(stmt);
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        self.comments(&stmt.comments);
        match &stmt.kind {
            StmtKind::Echo(operands) => self.line(format_args!("echo {};", Operands(operands))),
            StmtKind::Expr(Expr::Match(m)) => self.match_expr(m),
            StmtKind::Expr(expr) => self.line(format_args!("{};", expr)),
            StmtKind::Return(None) => self.line("return;"),
            StmtKind::Return(Some(value)) => self.line(format_args!("return {};", value)),
            StmtKind::Break => self.line("break;"),
            StmtKind::Continue => self.line("continue;"),
            StmtKind::Block(body) => {
                self.line("{");
                self.indented(|p| p.stmts(body));
                self.line("}");
            }
            StmtKind::If(if_) => self.if_stmt(if_),
            StmtKind::While { cond, body } => {
                self.line(format_args!("while ({}) {{", cond));
                self.indented(|p| p.stmts(body));
                self.line("}");
            }
            StmtKind::Switch(switch) => self.switch(switch),
            StmtKind::Nop => {}
        }
    }

    fn if_stmt(&mut self, if_: &If) {
        self.line(format_args!("if ({}) {{", if_.cond));
        self.indented(|p| p.stmts(&if_.body));
        for clause in &if_.elseifs {
            self.clause_header(&clause.comments, format_args!("elseif ({}) {{", clause.cond));
            self.indented(|p| p.stmts(&clause.body));
        }
        if let Some(else_) = &if_.else_ {
            self.clause_header(&else_.comments, "else {");
            self.indented(|p| p.stmts(&else_.body));
        }
        self.line("}");
    }

    /// Close the previous clause and open the next: `} elseif (...) {`, or
    /// with the clause's comments between the two when it has any
    fn clause_header(&mut self, comments: &[Comment], header: impl Display) {
        if comments.is_empty() {
            self.line(format_args!("}} {}", header));
        } else {
            self.line("}");
            self.comments(comments);
            self.line(header);
        }
    }

    fn switch(&mut self, switch: &Switch) {
        self.line(format_args!("switch ({}) {{", switch.subject));
        self.indented(|p| {
            for case in &switch.cases {
                p.case(case);
            }
        });
        self.line("}");
    }

    fn case(&mut self, case: &Case) {
        self.comments(&case.comments);
        match &case.key {
            Some(key) => self.line(format_args!("case {}:", key)),
            None => self.line("default:"),
        }
        self.indented(|p| p.stmts(&case.body));
    }

    fn match_expr(&mut self, m: &Match) {
        self.line(format_args!("match ({}) {{", m.subject));
        self.indented(|p| {
            for arm in &m.arms {
                p.comments(&arm.comments);
                p.line(format_args!("{},", ArmDisplay(arm)));
            }
        });
        self.line("};");
    }
}

struct Operands<'a>(&'a [Expr]);

impl Display for Operands<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_list(f, self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{parse, parse_expr};

    fn round_trip(source: &str) -> String {
        pretty(&parse(source).unwrap())
    }

    #[test]
    fn test_display_simple() {
        let expr = parse_expr("$x == 1 && $y > 0").unwrap();
        assert_eq!(expr.to_string(), "$x == 1 && $y > 0");
    }

    #[test]
    fn test_display_keeps_needed_parens() {
        let expr = parse_expr("($a || $b) && $c").unwrap();
        assert_eq!(expr.to_string(), "($a || $b) && $c");

        let expr = parse_expr("$a - ($b - $c)").unwrap();
        assert_eq!(expr.to_string(), "$a - ($b - $c)");

        let expr = parse_expr("($a - $b) - $c").unwrap();
        assert_eq!(expr.to_string(), "$a - $b - $c");

        let expr = parse_expr("!($a && $b)").unwrap();
        assert_eq!(expr.to_string(), "!($a && $b)");
    }

    #[test]
    fn test_display_postfix() {
        let expr = parse_expr("$obj->items[0]->count($a, 'b')").unwrap();
        assert_eq!(expr.to_string(), "$obj->items[0]->count($a, 'b')");
    }

    #[test]
    fn test_display_strings_keep_quotes() {
        let expr = parse_expr(r#"'it\'s' . "x: $x""#).unwrap();
        assert_eq!(expr.to_string(), r#"'it\'s' . "x: $x""#);
    }

    #[test]
    fn test_synthesized_string_is_escaped() {
        assert_eq!(Literal::string(r"a'b\c").to_string(), r"'a\'b\\c'");
    }

    #[test]
    fn test_pretty_if_chain() {
        let printed = round_trip(
            "<?php if ($x == 1) { echo 'a'; } elseif ($x == 2) { echo 'b'; } else { echo 'c'; }",
        );
        assert_eq!(
            printed,
            "<?php

if ($x == 1) {
    echo 'a';
} elseif ($x == 2) {
    echo 'b';
} else {
    echo 'c';
}
"
        );
    }

    #[test]
    fn test_pretty_switch() {
        let printed = round_trip(
            "switch ($x) { case 1: echo 'a'; break; // fall\n case 2: default: echo 'c'; }",
        );
        assert_eq!(
            printed,
            "switch ($x) {
    case 1:
        echo 'a';
        break;
    // fall
    case 2:
    default:
        echo 'c';
}
"
        );
    }

    #[test]
    fn test_pretty_clause_comments_on_own_line() {
        let printed = round_trip("if ($a) {\n} /* b */ else {\n echo 1; }");
        assert_eq!(
            printed,
            "if ($a) {
}
/* b */
else {
    echo 1;
}
"
        );
    }

    #[test]
    fn test_pretty_preserves_structure() {
        let sources = [
            "<?php\n// lead\nif ($x === 'a') { return 1; } elseif ($y) { $z = f($y) + 1; }",
            "while ($i < 10) { if ($i % 2 == 0) { continue; } echo $i, PHP_EOL; }",
            "{ echo [1, 2.5, null, true]; }",
            "$a = $b ? $c : ($d ? 1 : 2);",
        ];
        for source in sources {
            let program = parse(source).unwrap();
            let printed = pretty(&program);
            let reparsed = parse(&printed).unwrap();
            assert_eq!(program, reparsed, "round trip failed for: {source}");
        }
    }
}
