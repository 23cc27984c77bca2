//! Structural checks between parsing and translation
//!
//! Narrows a parsed program down to the one expression a predicate function
//! returns. Each rule is a hard gate; the first violation aborts.

use thiserror::Error;

use crate::ast::script::{Expr, Function, FunctionBody, Program, Statement};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    #[error("Expected exactly one top-level statement, found {0}")]
    StatementCount(usize),

    #[error("Unexpected statement type: {0}")]
    UnexpectedStatement(&'static str),

    #[error("Unexpected expression type: {0}")]
    NotAFunction(&'static str),

    #[error("Cannot use async functions")]
    AsyncFunction,

    #[error("Cannot use generator functions")]
    GeneratorFunction,

    #[error("Block statement should contain exactly one statement, found {0}")]
    BlockLength(usize),

    #[error("Expected ReturnStatement but got {0}")]
    ExpectedReturn(&'static str),

    #[error("Return statement is missing its argument")]
    MissingReturnArgument,

    #[error("Unsupported function body type: {0}")]
    UnsupportedBody(&'static str),
}

type Result<T> = std::result::Result<T, ShapeError>;

/// Validate a parsed program and return the predicate expression its
/// function returns.
pub fn validate(program: &Program) -> Result<&Expr> {
    let [statement] = program.body.as_slice() else {
        return Err(ShapeError::StatementCount(program.body.len()));
    };
    let Statement::Expression(expression) = statement else {
        return Err(ShapeError::UnexpectedStatement(statement.kind()));
    };
    let Expr::Function(function) = expression else {
        return Err(ShapeError::NotAFunction(expression.kind()));
    };
    validate_function(function)
}

/// Validate a function literal and return its predicate expression
pub fn validate_function(function: &Function) -> Result<&Expr> {
    if function.is_async {
        return Err(ShapeError::AsyncFunction);
    }
    if function.is_generator {
        return Err(ShapeError::GeneratorFunction);
    }
    match &function.body {
        FunctionBody::Block(body) => validate_block(body),
        FunctionBody::Expression(expr) => validate_body_expr(expr),
    }
}

fn validate_block(body: &[Statement]) -> Result<&Expr> {
    let [statement] = body else {
        return Err(ShapeError::BlockLength(body.len()));
    };
    let Statement::Return(argument) = statement else {
        return Err(ShapeError::ExpectedReturn(statement.kind()));
    };
    let argument = argument.as_ref().ok_or(ShapeError::MissingReturnArgument)?;
    validate_body_expr(argument)
}

/// The returned expression must be a logical combination or a single
/// comparison. Anything else (a bare field, a constant, a call) is rejected.
pub fn validate_body_expr(expr: &Expr) -> Result<&Expr> {
    match expr {
        Expr::Logical(..) => Ok(expr),
        Expr::Binary(_, op, _) if op.is_comparison() => Ok(expr),
        _ => Err(ShapeError::UnsupportedBody(expr.kind())),
    }
}
