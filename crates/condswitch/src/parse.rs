//! Parser for PHP-style source
//!
//! Produces a `Program` tree. Covers the statement and expression subset the
//! rewriter needs; anything else is a parse error.

use winnow::ascii::{Caseless, digit1, multispace0};
use winnow::combinator::{
    alt, cut_err, delimited, not, opt, peek, preceded, repeat, separated, terminated,
};
use winnow::error::{ContextError, ErrMode, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{one_of, take_till, take_until, take_while};

use crate::ast::expr::Expr;
use crate::ast::stmt::{Case, Else, ElseIf, If, Program, Stmt, StmtKind, Switch};
use crate::ast::{BinOp, Comment, Literal, Quote, StrLit, UnaryOp};

type PResult<T> = winnow::ModalResult<T>;

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (line {}, column {}, offset {})",
            self.message, self.line, self.column, self.offset
        )
    }
}

impl std::error::Error for ParseError {}

/// Parse a source file
pub fn parse(input: &str) -> Result<Program, ParseError> {
    let mut stream = input;
    match program.parse_next(&mut stream) {
        Ok(parsed) => {
            if stream.trim().is_empty() {
                Ok(parsed)
            } else {
                let offset = trailing_input_offset(input, stream);
                Err(build_parse_error(
                    "unexpected trailing input".to_string(),
                    input,
                    offset,
                ))
            }
        }
        Err(e) => {
            let offset = input.len().saturating_sub(stream.len());
            Err(build_parse_error(error_message(e), input, offset))
        }
    }
}

/// Parse a single expression (no trailing `;`)
pub fn parse_expr(input: &str) -> Result<Expr, ParseError> {
    let mut stream = input;
    match terminated(expr, ws).parse_next(&mut stream) {
        Ok(parsed) if stream.is_empty() => Ok(parsed),
        Ok(_) => {
            let offset = trailing_input_offset(input, stream);
            Err(build_parse_error(
                "unexpected trailing input".to_string(),
                input,
                offset,
            ))
        }
        Err(e) => {
            let offset = input.len().saturating_sub(stream.len());
            Err(build_parse_error(error_message(e), input, offset))
        }
    }
}

fn error_message(err: ErrMode<ContextError>) -> String {
    match err {
        ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => {
            let message = ctx.to_string();
            if message.is_empty() {
                "invalid syntax".to_string()
            } else {
                message
            }
        }
        ErrMode::Incomplete(_) => "incomplete input".to_string(),
    }
}

fn build_parse_error(message: String, input: &str, offset: usize) -> ParseError {
    let (line, column) = offset_to_line_column(input, offset);
    ParseError {
        message,
        offset,
        line,
        column,
    }
}

fn offset_to_line_column(input: &str, offset: usize) -> (usize, usize) {
    let mut bounded = offset.min(input.len());
    while !input.is_char_boundary(bounded) {
        bounded -= 1;
    }
    let mut line = 1usize;
    let mut column = 1usize;

    for ch in input[..bounded].chars() {
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }

    (line, column)
}

fn trailing_input_offset(input: &str, trailing: &str) -> usize {
    let base = input.len().saturating_sub(trailing.len());
    let non_ws = trailing
        .char_indices()
        .find(|(_, ch)| !ch.is_whitespace())
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    base + non_ws
}

fn backtrack<T>() -> PResult<T> {
    Err(ErrMode::Backtrack(ContextError::new()))
}

fn expected(what: &'static str) -> StrContext {
    StrContext::Expected(StrContextValue::Description(what))
}

// ============ Program and statement lists ============

fn program(input: &mut &str) -> PResult<Program> {
    let open_tag = opt((multispace0, "<?php")).parse_next(input)?.is_some();
    let stmts = stmt_list(input, StopAt::TopLevel)?;
    Ok(Program { open_tag, stmts })
}

#[derive(Clone, Copy, PartialEq)]
enum StopAt {
    /// Top level: run to end of input (a stray `}` is left as trailing input)
    TopLevel,
    /// Braced block: stop before `}`
    Brace,
    /// Switch case body: stop before `}`, `case` or `default`
    Case,
}

fn at_stop(input: &str, stop: StopAt) -> bool {
    if input.is_empty() {
        return true;
    }
    match stop {
        StopAt::TopLevel | StopAt::Brace => input.starts_with('}'),
        StopAt::Case => {
            let mut probe = input;
            input.starts_with('}')
                || peek(alt((keyword("case"), keyword("default"))))
                    .parse_next(&mut probe)
                    .is_ok()
        }
    }
}

fn stmt_list(input: &mut &str, stop: StopAt) -> PResult<Vec<Stmt>> {
    let mut stmts = Vec::new();
    loop {
        let checkpoint = *input;
        let comments = comments(input)?;
        if at_stop(input, stop) {
            if stop == StopAt::Case && !input.is_empty() && !input.starts_with('}') {
                // Comments ahead of the next `case` lead that case
                *input = checkpoint;
            } else if !comments.is_empty() {
                stmts.push(Stmt::new(StmtKind::Nop).with_comments(comments));
            }
            return Ok(stmts);
        }
        let kind = stmt_kind.parse_next(input)?;
        stmts.push(Stmt::new(kind).with_comments(comments));
    }
}

/// A single statement with its leading comments
fn stmt(input: &mut &str) -> PResult<Stmt> {
    let comments = comments(input)?;
    let kind = stmt_kind.parse_next(input)?;
    Ok(Stmt::new(kind).with_comments(comments))
}

fn stmt_kind(input: &mut &str) -> PResult<StmtKind> {
    alt((
        if_stmt.map(StmtKind::If),
        while_stmt,
        switch_stmt.map(StmtKind::Switch),
        echo_stmt,
        return_stmt,
        terminated(keyword("break"), semi).value(StmtKind::Break),
        terminated(keyword("continue"), semi).value(StmtKind::Continue),
        block.map(StmtKind::Block),
        ';'.value(StmtKind::Nop),
        terminated(expr, semi).map(StmtKind::Expr),
    ))
    .parse_next(input)
}

fn semi(input: &mut &str) -> PResult<()> {
    preceded(ws, cut_err(';').context(expected("`;`")))
        .void()
        .parse_next(input)
}

fn block(input: &mut &str) -> PResult<Vec<Stmt>> {
    '{'.parse_next(input)?;
    let stmts = stmt_list(input, StopAt::Brace)?;
    cut_err('}').context(expected("`}`")).parse_next(input)?;
    Ok(stmts)
}

/// Body of a control structure: a braced block or one statement
fn branch_body(input: &mut &str) -> PResult<Vec<Stmt>> {
    ws.parse_next(input)?;
    if input.starts_with('{') {
        block.parse_next(input)
    } else {
        stmt.map(|s| vec![s]).parse_next(input)
    }
}

fn paren_cond(input: &mut &str) -> PResult<Expr> {
    cut_err(delimited(
        (ws, '(', ws),
        expr,
        (ws, ')'),
    ))
    .context(expected("parenthesized condition"))
    .parse_next(input)
}

// ============ Control structures ============

fn if_stmt(input: &mut &str) -> PResult<If> {
    keyword("if").parse_next(input)?;
    let cond = paren_cond.parse_next(input)?;
    let body = cut_err(branch_body).parse_next(input)?;

    let mut elseifs = Vec::new();
    let mut else_ = None;
    loop {
        // Comments here lead the next clause; give them back if none follows
        let checkpoint = *input;
        let comments = comments(input)?;
        if keyword("elseif").parse_next(input).is_ok() {
            let cond = paren_cond.parse_next(input)?;
            let body = cut_err(branch_body).parse_next(input)?;
            elseifs.push(ElseIf {
                comments,
                cond,
                body,
            });
        } else if keyword("else").parse_next(input).is_ok() {
            let body = cut_err(branch_body).parse_next(input)?;
            else_ = Some(Else { comments, body });
            break;
        } else {
            *input = checkpoint;
            break;
        }
    }

    Ok(If {
        cond,
        body,
        elseifs,
        else_,
    })
}

fn while_stmt(input: &mut &str) -> PResult<StmtKind> {
    keyword("while").parse_next(input)?;
    let cond = paren_cond.parse_next(input)?;
    let body = cut_err(branch_body).parse_next(input)?;
    Ok(StmtKind::While { cond, body })
}

fn switch_stmt(input: &mut &str) -> PResult<Switch> {
    keyword("switch").parse_next(input)?;
    let subject = paren_cond.parse_next(input)?;
    cut_err((ws, '{')).context(expected("`{`")).parse_next(input)?;

    let mut cases = Vec::new();
    loop {
        // Only an empty switch can have comments left over here, they
        // have no case to lead and are dropped
        let comments = comments(input)?;
        if input.starts_with('}') {
            '}'.parse_next(input)?;
            break;
        }
        let key = cut_err(alt((
            preceded(keyword("case"), preceded(ws, expr)).map(Some),
            keyword("default").value(None),
        )))
        .context(expected("`case` or `default`"))
        .parse_next(input)?;
        cut_err((ws, one_of([':', ';'])))
            .context(expected("`:`"))
            .parse_next(input)?;
        let body = stmt_list(input, StopAt::Case)?;
        cases.push(Case {
            comments,
            key,
            body,
        });
    }

    Ok(Switch { subject, cases })
}

fn echo_stmt(input: &mut &str) -> PResult<StmtKind> {
    keyword("echo").parse_next(input)?;
    let operands: Vec<Expr> =
        cut_err(separated(1.., preceded(ws, expr), (ws, ','))).parse_next(input)?;
    semi.parse_next(input)?;
    Ok(StmtKind::Echo(operands))
}

fn return_stmt(input: &mut &str) -> PResult<StmtKind> {
    keyword("return").parse_next(input)?;
    let value = opt(preceded(ws, expr)).parse_next(input)?;
    semi.parse_next(input)?;
    Ok(StmtKind::Return(value))
}

// ============ Expressions (handles precedence) ============

fn expr(input: &mut &str) -> PResult<Expr> {
    assign_expr.parse_next(input)
}

fn assign_expr(input: &mut &str) -> PResult<Expr> {
    let target = ternary_expr.parse_next(input)?;
    let assign = opt(preceded((ws, '=', not(one_of(['=', '>']))), assign_expr))
        .parse_next(input)?;
    Ok(match assign {
        Some(value) => Expr::Assign(Box::new(target), Box::new(value)),
        None => target,
    })
}

fn ternary_expr(input: &mut &str) -> PResult<Expr> {
    let cond = or_expr.parse_next(input)?;
    let branches = opt((
        preceded((ws, '?'), expr),
        preceded((ws, ':'), cut_err(ternary_expr)),
    ))
    .parse_next(input)?;
    Ok(match branches {
        Some((then, otherwise)) => {
            Expr::Ternary(Box::new(cond), Box::new(then), Box::new(otherwise))
        }
        None => cond,
    })
}

fn or_expr(input: &mut &str) -> PResult<Expr> {
    let first = and_expr.parse_next(input)?;
    let rest: Vec<Expr> = repeat(0.., preceded((ws, "||"), and_expr)).parse_next(input)?;
    Ok(rest.into_iter().fold(first, |l, r| l.binop(BinOp::Or, r)))
}

fn and_expr(input: &mut &str) -> PResult<Expr> {
    let first = eq_expr.parse_next(input)?;
    let rest: Vec<Expr> = repeat(0.., preceded((ws, "&&"), eq_expr)).parse_next(input)?;
    Ok(rest.into_iter().fold(first, |l, r| l.binop(BinOp::And, r)))
}

fn eq_expr(input: &mut &str) -> PResult<Expr> {
    let left = rel_expr.parse_next(input)?;
    let rest = opt((preceded(ws, eq_op), rel_expr)).parse_next(input)?;
    Ok(match rest {
        Some((op, right)) => left.binop(op, right),
        None => left,
    })
}

fn eq_op(input: &mut &str) -> PResult<BinOp> {
    alt((
        "===".value(BinOp::Identical),
        "!==".value(BinOp::NotIdentical),
        "==".value(BinOp::Equal),
        "!=".value(BinOp::NotEqual),
        "<>".value(BinOp::NotEqual),
    ))
    .parse_next(input)
}

fn rel_expr(input: &mut &str) -> PResult<Expr> {
    let left = concat_expr.parse_next(input)?;
    let rest = opt((preceded(ws, rel_op), concat_expr)).parse_next(input)?;
    Ok(match rest {
        Some((op, right)) => left.binop(op, right),
        None => left,
    })
}

fn rel_op(input: &mut &str) -> PResult<BinOp> {
    alt((
        "<=".value(BinOp::Le),
        ">=".value(BinOp::Ge),
        terminated('<', not('>')).value(BinOp::Lt),
        '>'.value(BinOp::Gt),
    ))
    .parse_next(input)
}

fn concat_expr(input: &mut &str) -> PResult<Expr> {
    let first = add_expr.parse_next(input)?;
    let rest: Vec<Expr> = repeat(
        0..,
        preceded(
            (ws, '.', not(one_of(|c: char| c.is_ascii_digit() || c == '.' || c == '='))),
            add_expr,
        ),
    )
    .parse_next(input)?;
    Ok(rest.into_iter().fold(first, |l, r| l.binop(BinOp::Concat, r)))
}

fn add_expr(input: &mut &str) -> PResult<Expr> {
    let first = mul_expr.parse_next(input)?;
    let rest: Vec<(BinOp, Expr)> =
        repeat(0.., (preceded(ws, add_op), mul_expr)).parse_next(input)?;
    Ok(rest.into_iter().fold(first, |l, (op, r)| l.binop(op, r)))
}

fn add_op(input: &mut &str) -> PResult<BinOp> {
    alt((
        terminated('+', not(one_of(['+', '=']))).value(BinOp::Add),
        terminated('-', not(one_of(['-', '=', '>']))).value(BinOp::Sub),
    ))
    .parse_next(input)
}

fn mul_expr(input: &mut &str) -> PResult<Expr> {
    let first = unary_expr.parse_next(input)?;
    let rest: Vec<(BinOp, Expr)> =
        repeat(0.., (preceded(ws, mul_op), unary_expr)).parse_next(input)?;
    Ok(rest.into_iter().fold(first, |l, (op, r)| l.binop(op, r)))
}

fn mul_op(input: &mut &str) -> PResult<BinOp> {
    terminated(
        alt((
            '*'.value(BinOp::Mul),
            '/'.value(BinOp::Div),
            '%'.value(BinOp::Mod),
        )),
        not(one_of(['*', '/', '='])),
    )
    .parse_next(input)
}

fn unary_expr(input: &mut &str) -> PResult<Expr> {
    preceded(
        ws,
        alt((
            preceded(('!', ws), unary_expr).map(|e| Expr::Unary(UnaryOp::Not, Box::new(e))),
            preceded(('-', not('-'), ws), unary_expr)
                .map(|e| Expr::Unary(UnaryOp::Neg, Box::new(e))),
            postfix_expr,
        )),
    )
    .parse_next(input)
}

// ============ Postfix expressions (call, index, ->prop) ============

enum Postfix {
    Call(Vec<Expr>),
    Index(Expr),
    Property(String),
}

fn postfix_expr(input: &mut &str) -> PResult<Expr> {
    let base = primary.parse_next(input)?;
    let ops: Vec<Postfix> = repeat(0.., postfix_op).parse_next(input)?;

    Ok(ops.into_iter().fold(base, |acc, op| match op {
        Postfix::Call(args) => Expr::Call(Box::new(acc), args),
        Postfix::Index(index) => Expr::Index(Box::new(acc), Box::new(index)),
        Postfix::Property(name) => Expr::Property(Box::new(acc), name),
    }))
}

fn postfix_op(input: &mut &str) -> PResult<Postfix> {
    preceded(
        ws,
        alt((
            expr_list('(', ')').map(Postfix::Call),
            delimited(('[', ws), expr, (ws, ']')).map(Postfix::Index),
            preceded(("->", ws), ident).map(Postfix::Property),
        )),
    )
    .parse_next(input)
}

/// Comma-separated expressions between `open` and `close`, trailing comma allowed
fn expr_list<'a>(open: char, close: char) -> impl FnMut(&mut &'a str) -> PResult<Vec<Expr>> {
    move |input: &mut &'a str| {
        delimited(
            (open, ws),
            opt(terminated(
                separated(1.., preceded(ws, expr), (ws, ',')),
                opt((ws, ',')),
            ))
            .map(|items| items.unwrap_or_default()),
            (ws, close),
        )
        .parse_next(input)
    }
}

// ============ Primary expressions ============

fn primary(input: &mut &str) -> PResult<Expr> {
    preceded(
        ws,
        alt((
            delimited(('(', ws), expr, (ws, ')')),
            expr_list('[', ']').map(Expr::Array),
            preceded('$', ident).map(Expr::Variable),
            literal.map(Expr::Literal),
            name.map(Expr::Name),
        )),
    )
    .parse_next(input)
}

/// Bare or namespaced name: `strlen`, `PHP_EOL`, `\\App\\helper`
fn name(input: &mut &str) -> PResult<String> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_' || c == '\\'),
        take_while(0.., |c: char| is_ident_char(c) || c == '\\'),
    )
        .take()
        .map(str::to_string)
        .parse_next(input)
}

fn ident(input: &mut &str) -> PResult<String> {
    ident_str.map(str::to_string).parse_next(input)
}

fn ident_str<'a>(input: &mut &'a str) -> PResult<&'a str> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., is_ident_char),
    )
        .take()
        .parse_next(input)
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// A case-insensitive keyword that is not the prefix of a longer identifier
fn keyword<'a>(word: &'static str) -> impl FnMut(&mut &'a str) -> PResult<&'a str> {
    move |input: &mut &'a str| {
        terminated(Caseless(word), not(one_of(is_ident_char))).parse_next(input)
    }
}

// ============ Literals ============

fn literal(input: &mut &str) -> PResult<Literal> {
    alt((
        keyword("true").value(Literal::Bool(true)),
        keyword("false").value(Literal::Bool(false)),
        keyword("null").value(Literal::Null),
        float_lit,
        int_lit,
        string_lit,
    ))
    .parse_next(input)
}

fn int_lit(input: &mut &str) -> PResult<Literal> {
    digit1
        .try_map(|s: &str| match s.parse::<i64>() {
            Ok(n) => Ok(Literal::Int(n)),
            // Too large for an integer: PHP reads it as a float
            Err(_) => s.parse::<f64>().map(Literal::Float),
        })
        .parse_next(input)
}

fn float_lit(input: &mut &str) -> PResult<Literal> {
    (digit1, '.', digit1)
        .take()
        .try_map(|s: &str| s.parse::<f64>())
        .map(Literal::Float)
        .parse_next(input)
}

fn string_lit(input: &mut &str) -> PResult<Literal> {
    alt((
        delimited('\'', string_raw('\''), '\'').map(|raw| StrLit {
            raw,
            quote: Quote::Single,
        }),
        delimited('"', string_raw('"'), '"').map(|raw| StrLit {
            raw,
            quote: Quote::Double,
        }),
    ))
    .map(Literal::String)
    .parse_next(input)
}

/// Raw string contents up to the closing quote, escapes kept as written
fn string_raw<'a>(quote: char) -> impl FnMut(&mut &'a str) -> PResult<String> {
    move |input: &mut &'a str| {
        let mut raw = String::new();
        loop {
            let Some(c) = input.chars().next() else {
                return backtrack();
            };
            if c == quote {
                break;
            }
            *input = &input[c.len_utf8()..];
            raw.push(c);
            if c == '\\' {
                let Some(escaped) = input.chars().next() else {
                    return backtrack();
                };
                *input = &input[escaped.len_utf8()..];
                raw.push(escaped);
            }
        }
        Ok(raw)
    }
}

// ============ Whitespace and comments ============

/// Skip whitespace and comments (inside expressions comments are dropped)
fn ws(input: &mut &str) -> PResult<()> {
    comments.void().parse_next(input)
}

/// Collect the comments (and skip the whitespace) ahead of the next token
fn comments(input: &mut &str) -> PResult<Vec<Comment>> {
    let found: Vec<Comment> = repeat(0.., preceded(multispace0, comment)).parse_next(input)?;
    multispace0.parse_next(input)?;
    Ok(found)
}

fn comment(input: &mut &str) -> PResult<Comment> {
    alt((
        ("/*", take_until(0.., "*/"), "*/").take(),
        ("//", take_till(0.., ['\n', '\r'])).take(),
        ('#', not('['), take_till(0.., ['\n', '\r'])).take(),
    ))
    .map(|text: &str| Comment::new(text.trim_end()))
    .parse_next(input)
}

// ============ Sanity Tests ============
// Most testing is done via integration tests in tests/integration.rs
