//! Parser for function-literal source text
//!
//! Produces script::Program, which shape validation then narrows down to a
//! single predicate expression before translation.

use winnow::ascii::{digit1, multispace1};
use winnow::combinator::{alt, delimited, not, opt, preceded, repeat, separated, terminated};
use winnow::error::ErrMode;
use winnow::prelude::*;
use winnow::token::{one_of, take_till, take_until, take_while};

use crate::ast::Value;
use crate::ast::script::{
    BinaryOp, DeclarationKind, Expr, Function, FunctionBody, LogicalOp, Program, Property,
    Statement, UnaryOp,
};

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

/// Parse source text as a program (a sequence of statements)
pub fn parse(input: &str) -> Result<Program, ParseError> {
    let mut stream = input;
    match program.parse_next(&mut stream) {
        Ok(parsed) => {
            if stream.is_empty() {
                Ok(parsed)
            } else {
                let offset = input.len() - stream.len();
                Err(build_parse_error(
                    "unexpected trailing input".to_string(),
                    input,
                    offset,
                ))
            }
        }
        Err(e) => {
            let offset = input.len().saturating_sub(stream.len());
            let message = match e {
                ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx.to_string(),
                ErrMode::Incomplete(_) => String::new(),
            };
            let message = if message.is_empty() {
                "syntax error".to_string()
            } else {
                message
            };
            Err(build_parse_error(message, input, offset))
        }
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
    let bounded = offset.min(input.len());
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

// ============ Statements ============

fn program(input: &mut &str) -> PResult<Program> {
    preceded(ws, repeat(0.., terminated(statement, ws)))
        .map(|body| Program { body })
        .parse_next(input)
}

fn statement(input: &mut &str) -> PResult<Statement> {
    alt((
        block.map(Statement::Block),
        return_statement,
        variable_declaration,
        ';'.value(Statement::Empty),
        terminated(expr, opt((ws, ';'))).map(Statement::Expression),
    ))
    .parse_next(input)
}

fn block(input: &mut &str) -> PResult<Vec<Statement>> {
    delimited(('{', ws), repeat(0.., terminated(statement, ws)), '}').parse_next(input)
}

fn return_statement(input: &mut &str) -> PResult<Statement> {
    preceded(keyword("return"), (opt(preceded(ws, expr)), opt((ws, ';'))))
        .map(|(argument, _)| Statement::Return(argument))
        .parse_next(input)
}

fn variable_declaration(input: &mut &str) -> PResult<Statement> {
    let kind = alt((
        keyword("let").value(DeclarationKind::Let),
        keyword("const").value(DeclarationKind::Const),
        keyword("var").value(DeclarationKind::Var),
    ))
    .parse_next(input)?;
    let name = preceded(ws, ident).parse_next(input)?;
    let init = opt(preceded((ws, '=', ws), expr)).parse_next(input)?;
    opt((ws, ';')).parse_next(input)?;
    Ok(Statement::VariableDeclaration { kind, name, init })
}

// ============ Top-level expression (handles precedence) ============

fn expr(input: &mut &str) -> PResult<Expr> {
    conditional_expr.parse_next(input)
}

fn conditional_expr(input: &mut &str) -> PResult<Expr> {
    let test = or_expr.parse_next(input)?;
    let branches = opt((
        ws,
        terminated('?', not('?')),
        ws,
        expr,
        ws,
        ':',
        ws,
        expr,
    ))
    .parse_next(input)?;
    Ok(match branches {
        Some((_, _, _, consequent, _, _, _, alternate)) => Expr::Conditional(
            Box::new(test),
            Box::new(consequent),
            Box::new(alternate),
        ),
        None => test,
    })
}

fn or_expr(input: &mut &str) -> PResult<Expr> {
    logical_chain(input, and_expr, or_op)
}

fn or_op(input: &mut &str) -> PResult<LogicalOp> {
    alt(("||".value(LogicalOp::Or), "??".value(LogicalOp::Nullish))).parse_next(input)
}

fn and_expr(input: &mut &str) -> PResult<Expr> {
    logical_chain(input, bit_or_expr, and_op)
}

fn and_op(input: &mut &str) -> PResult<LogicalOp> {
    "&&".value(LogicalOp::And).parse_next(input)
}

fn logical_chain(
    input: &mut &str,
    operand: fn(&mut &str) -> PResult<Expr>,
    op: fn(&mut &str) -> PResult<LogicalOp>,
) -> PResult<Expr> {
    let first = operand(input)?;
    let rest: Vec<(LogicalOp, Expr)> =
        repeat(0.., (ws, op, ws, operand).map(|(_, op, _, e)| (op, e))).parse_next(input)?;
    Ok(rest
        .into_iter()
        .fold(first, |l, (op, r)| l.logical(op, r)))
}

fn binary_chain(
    input: &mut &str,
    operand: fn(&mut &str) -> PResult<Expr>,
    op: fn(&mut &str) -> PResult<BinaryOp>,
) -> PResult<Expr> {
    let first = operand(input)?;
    let rest: Vec<(BinaryOp, Expr)> =
        repeat(0.., (ws, op, ws, operand).map(|(_, op, _, e)| (op, e))).parse_next(input)?;
    Ok(rest.into_iter().fold(first, |l, (op, r)| l.binary(op, r)))
}

fn bit_or_expr(input: &mut &str) -> PResult<Expr> {
    binary_chain(input, bit_xor_expr, bit_or_op)
}

fn bit_or_op(input: &mut &str) -> PResult<BinaryOp> {
    terminated('|', not(one_of(['|', '='])))
        .value(BinaryOp::BitOr)
        .parse_next(input)
}

fn bit_xor_expr(input: &mut &str) -> PResult<Expr> {
    binary_chain(input, bit_and_expr, bit_xor_op)
}

fn bit_xor_op(input: &mut &str) -> PResult<BinaryOp> {
    terminated('^', not('='))
        .value(BinaryOp::BitXor)
        .parse_next(input)
}

fn bit_and_expr(input: &mut &str) -> PResult<Expr> {
    binary_chain(input, equality_expr, bit_and_op)
}

fn bit_and_op(input: &mut &str) -> PResult<BinaryOp> {
    terminated('&', not(one_of(['&', '='])))
        .value(BinaryOp::BitAnd)
        .parse_next(input)
}

fn equality_expr(input: &mut &str) -> PResult<Expr> {
    binary_chain(input, relational_expr, equality_op)
}

fn equality_op(input: &mut &str) -> PResult<BinaryOp> {
    alt((
        "===".value(BinaryOp::StrictEq),
        "!==".value(BinaryOp::StrictNe),
        "==".value(BinaryOp::Eq),
        "!=".value(BinaryOp::Ne),
    ))
    .parse_next(input)
}

fn relational_expr(input: &mut &str) -> PResult<Expr> {
    binary_chain(input, shift_expr, relational_op)
}

fn relational_op(input: &mut &str) -> PResult<BinaryOp> {
    alt((
        "<=".value(BinaryOp::Le),
        ">=".value(BinaryOp::Ge),
        terminated('<', not('<')).value(BinaryOp::Lt),
        terminated('>', not('>')).value(BinaryOp::Gt),
    ))
    .parse_next(input)
}

fn shift_expr(input: &mut &str) -> PResult<Expr> {
    binary_chain(input, additive_expr, shift_op)
}

fn shift_op(input: &mut &str) -> PResult<BinaryOp> {
    alt(("<<".value(BinaryOp::Shl), ">>".value(BinaryOp::Shr))).parse_next(input)
}

fn additive_expr(input: &mut &str) -> PResult<Expr> {
    binary_chain(input, multiplicative_expr, additive_op)
}

fn additive_op(input: &mut &str) -> PResult<BinaryOp> {
    alt(('+'.value(BinaryOp::Add), '-'.value(BinaryOp::Sub))).parse_next(input)
}

fn multiplicative_expr(input: &mut &str) -> PResult<Expr> {
    binary_chain(input, unary_expr, multiplicative_op)
}

fn multiplicative_op(input: &mut &str) -> PResult<BinaryOp> {
    alt((
        '*'.value(BinaryOp::Mul),
        '/'.value(BinaryOp::Div),
        '%'.value(BinaryOp::Mod),
    ))
    .parse_next(input)
}

fn unary_expr(input: &mut &str) -> PResult<Expr> {
    let op = opt(terminated(unary_op, ws)).parse_next(input)?;
    match op {
        Some(op) => unary_expr
            .map(|e| Expr::Unary(op, Box::new(e)))
            .parse_next(input),
        None => postfix_expr.parse_next(input),
    }
}

fn unary_op(input: &mut &str) -> PResult<UnaryOp> {
    alt((
        terminated('!', not('=')).value(UnaryOp::Not),
        '-'.value(UnaryOp::Neg),
        '+'.value(UnaryOp::Plus),
        '~'.value(UnaryOp::BitNot),
    ))
    .parse_next(input)
}

// ============ Postfix expressions (.name, [expr] and (call)) ============

enum Postfix {
    Member(Property),
    Call(Vec<Expr>),
}

fn postfix_expr(input: &mut &str) -> PResult<Expr> {
    let base = primary.parse_next(input)?;
    let ops: Vec<Postfix> = repeat(0.., postfix_op).parse_next(input)?;

    Ok(ops.into_iter().fold(base, |acc, op| match op {
        Postfix::Member(property) => Expr::Member(Box::new(acc), property),
        Postfix::Call(args) => Expr::Call(Box::new(acc), args),
    }))
}

fn postfix_op(input: &mut &str) -> PResult<Postfix> {
    preceded(ws, alt((static_member, computed_member, call_args))).parse_next(input)
}

fn static_member(input: &mut &str) -> PResult<Postfix> {
    preceded(('.', ws), ident_name)
        .map(|name| Postfix::Member(Property::Static(name.to_string())))
        .parse_next(input)
}

fn computed_member(input: &mut &str) -> PResult<Postfix> {
    delimited(('[', ws), expr, (ws, ']'))
        .map(|e| Postfix::Member(Property::Computed(Box::new(e))))
        .parse_next(input)
}

fn call_args(input: &mut &str) -> PResult<Postfix> {
    delimited(
        ('(', ws),
        terminated(separated(0.., expr, (ws, ',', ws)), opt((ws, ','))),
        (ws, ')'),
    )
    .map(Postfix::Call)
    .parse_next(input)
}

// ============ Primary expressions ============

fn primary(input: &mut &str) -> PResult<Expr> {
    alt((
        function_expr,
        arrow_function,
        paren_expr,
        literal.map(Expr::Literal),
        ident.map(Expr::Identifier),
    ))
    .parse_next(input)
}

fn paren_expr(input: &mut &str) -> PResult<Expr> {
    delimited(('(', ws), expr, (ws, ')')).parse_next(input)
}

/// `async function* name(a, b) { ... }`
fn function_expr(input: &mut &str) -> PResult<Expr> {
    let is_async = opt(terminated(keyword("async"), ws))
        .parse_next(input)?
        .is_some();
    keyword("function").parse_next(input)?;
    let is_generator = opt(preceded(ws, '*')).parse_next(input)?.is_some();
    let name = opt(preceded(ws, ident)).parse_next(input)?;
    let params = preceded(ws, param_list).parse_next(input)?;
    let body = preceded(ws, block).parse_next(input)?;
    Ok(Expr::Function(Function {
        name,
        params,
        body: FunctionBody::Block(body),
        is_arrow: false,
        is_async,
        is_generator,
    }))
}

/// `x => body`, `(a, b) => body`, `async x => body`
fn arrow_function(input: &mut &str) -> PResult<Expr> {
    let is_async = opt(terminated(keyword("async"), ws))
        .parse_next(input)?
        .is_some();
    let params = alt((ident.map(|p| vec![p]), param_list)).parse_next(input)?;
    (ws, "=>", ws).parse_next(input)?;
    let body = alt((
        block.map(FunctionBody::Block),
        expr.map(|e| FunctionBody::Expression(Box::new(e))),
    ))
    .parse_next(input)?;
    Ok(Expr::Function(Function {
        name: None,
        params,
        body,
        is_arrow: true,
        is_async,
        is_generator: false,
    }))
}

fn param_list(input: &mut &str) -> PResult<Vec<String>> {
    delimited(
        ('(', ws),
        terminated(separated(0.., param, (ws, ',', ws)), opt((ws, ','))),
        (ws, ')'),
    )
    .parse_next(input)
}

/// Parameter name, with an optional `: Type` annotation that is dropped
fn param(input: &mut &str) -> PResult<String> {
    terminated(ident, opt((ws, ':', ws, ident_name))).parse_next(input)
}

// ============ Identifiers ============

const RESERVED: &[&str] = &[
    "await",
    "class",
    "const",
    "delete",
    "else",
    "false",
    "function",
    "if",
    "in",
    "instanceof",
    "let",
    "new",
    "null",
    "return",
    "this",
    "true",
    "typeof",
    "var",
    "void",
    "yield",
];

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Any identifier-shaped name, reserved words included (property names)
fn ident_name<'a>(input: &mut &'a str) -> PResult<&'a str> {
    (one_of(is_ident_start), take_while(0.., is_ident_char))
        .take()
        .parse_next(input)
}

fn ident(input: &mut &str) -> PResult<String> {
    ident_name
        .verify(|name: &str| !RESERVED.contains(&name))
        .map(String::from)
        .parse_next(input)
}

/// Match a keyword that is not the prefix of a longer identifier
fn keyword<'a>(kw: &'static str) -> impl FnMut(&mut &'a str) -> PResult<&'a str> {
    move |input: &mut &'a str| terminated(kw, not(one_of(is_ident_char))).parse_next(input)
}

// ============ Literals ============

fn literal(input: &mut &str) -> PResult<Value> {
    alt((
        keyword("true").value(Value::Bool(true)),
        keyword("false").value(Value::Bool(false)),
        keyword("null").value(Value::Null),
        number_lit,
        string_lit,
    ))
    .parse_next(input)
}

fn number_lit(input: &mut &str) -> PResult<Value> {
    (
        digit1,
        opt(('.', digit1)),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)),
    )
        .take()
        .try_map(parse_number)
        .parse_next(input)
}

fn parse_number(text: &str) -> Result<Value, std::num::ParseFloatError> {
    if !text.contains(['.', 'e', 'E'])
        && let Ok(n) = text.parse::<i64>()
    {
        return Ok(Value::Int(n));
    }
    text.parse::<f64>().map(Value::Float)
}

fn string_lit(input: &mut &str) -> PResult<Value> {
    alt((
        delimited('"', string_contents('"'), '"'),
        delimited('\'', string_contents('\''), '\''),
    ))
    .map(Value::String)
    .parse_next(input)
}

fn string_contents<'a>(quote: char) -> impl FnMut(&mut &'a str) -> PResult<String> {
    move |input: &mut &'a str| {
        let mut result = String::new();
        loop {
            let Some(c) = input.chars().next() else {
                return Err(ErrMode::Backtrack(winnow::error::ContextError::new()));
            };
            if c == quote {
                break;
            } else if c == '\\' {
                *input = &input[1..];
                let Some(escaped) = input.chars().next() else {
                    return Err(ErrMode::Backtrack(winnow::error::ContextError::new()));
                };
                let unescaped = match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '\\' => '\\',
                    '"' => '"',
                    '\'' => '\'',
                    '0' => '\0',
                    _ => escaped, // Unknown escapes pass through
                };
                result.push(unescaped);
                *input = &input[escaped.len_utf8()..];
            } else if c == '\n' {
                return Err(ErrMode::Backtrack(winnow::error::ContextError::new()));
            } else {
                result.push(c);
                *input = &input[c.len_utf8()..];
            }
        }
        Ok(result)
    }
}

// ============ Whitespace and comments ============

fn ws(input: &mut &str) -> PResult<()> {
    repeat(0.., alt((multispace1.void(), line_comment, block_comment))).parse_next(input)
}

fn line_comment(input: &mut &str) -> PResult<()> {
    ("//", take_till(0.., ['\n', '\r'])).void().parse_next(input)
}

fn block_comment(input: &mut &str) -> PResult<()> {
    ("/*", take_until(0.., "*/"), "*/").void().parse_next(input)
}

// ============ Sanity Tests ============
// End-to-end behavior is covered in tests/integration.rs
