//! predsql - compile predicate functions to parameterized SQL
//!
//! Takes the source text of a filter function such as
//! `x => x.age > 18 && x.name != null` and turns it into a SQL boolean
//! expression with named placeholders plus the values to bind.
//!
//! ## Quick Start
//!
//! ```ignore
//! use predsql::{compile, ParameterWriter, QueryStringBuilder};
//!
//! let predicate = compile("x => x.kind == 'merchant' || x.gold >= 100")?;
//! assert_eq!(predicate.to_raw_string(), "[kind] = @p0 OR [gold] >= @p1");
//! let bindings = predicate.parameters(); // [(@p0, "merchant"), (@p1, 100)]
//! ```
//!
//! ## Composing statements
//!
//! ```ignore
//! use predsql::{compile_with, ParameterProvider, SelectQuery};
//!
//! let mut params = ParameterProvider::new();
//! let filter = compile_with("x => x.id == 7", &mut params)?;
//! let command = SelectQuery::new("users").fields(["id", "name"]).filter(filter).build();
//! // SELECT [id], [name] FROM [users] WHERE [id] = @p0
//! ```
//!
//! ## Accepted functions
//!
//! - `x => <predicate>` or `function (x) { return <predicate>; }`
//! - not `async`, not a generator, one `return` when a block is used
//! - `<predicate>` is `&&` / `||` over comparisons `== === != !== > >= < <=`
//!   between `x.field` references and literals (number, string, bool, null)

mod ast;
pub mod builder;
mod param;
mod parse;
mod pretty;
mod query;
mod shape;
mod translate;

use thiserror::Error;

// ============ Primary Public API ============

pub use ast::Value;
pub use ast::predicate::{
    Comparator, ComparisonPredicate, CompoundPredicate, Field, Literal, LogicalOperator, Node,
    ParameterWriter, QueryStringBuilder,
};
pub use param::{DEFAULT_PREFIX, Parameter, ParameterProvider};
pub use query::{Command, InsertQuery, QueryError, SelectQuery, UpdateQuery};

/// Compile function source into a predicate with fresh `@p0..` numbering
pub fn compile(source: &str) -> Result<Node, CompileError> {
    let mut params = ParameterProvider::new();
    compile_with(source, &mut params)
}

/// Compile function source, reserving placeholders from a caller-owned
/// provider so several fragments can share one numbering.
pub fn compile_with(source: &str, params: &mut ParameterProvider) -> Result<Node, CompileError> {
    let wrapped = format!("({source})");
    // Positions are reported against `source`, not the wrapped text
    let program = parse::parse(&wrapped).map_err(|mut e| {
        e.offset = e.offset.saturating_sub(1).min(source.len());
        if e.line == 1 {
            e.column = e.column.saturating_sub(1).max(1);
        }
        e
    })?;
    log::trace!("parsed program: {program}");
    let body = shape::validate(&program)?;
    finish(body, params)
}

/// Compile a function literal built in code (see [`builder`])
pub fn compile_expr(
    expr: &ast::script::Expr,
    params: &mut ParameterProvider,
) -> Result<Node, CompileError> {
    let ast::script::Expr::Function(function) = expr else {
        return Err(shape::ShapeError::NotAFunction(expr.kind()).into());
    };
    let body = shape::validate_function(function)?;
    finish(body, params)
}

fn finish(body: &ast::script::Expr, params: &mut ParameterProvider) -> Result<Node, CompileError> {
    let first = params.reserved();
    let node = translate::translate(body, params)?;
    log::debug!(
        "compiled predicate `{}` binding {} parameter(s)",
        node,
        params.reserved() - first
    );
    Ok(node)
}

// ============ Errors ============

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Parse error: {0}")]
    Parse(#[from] parse::ParseError),
    #[error("Unsupported function shape: {0}")]
    Shape(#[from] shape::ShapeError),
    #[error("Unsupported expression: {0}")]
    Translate(#[from] translate::TranslateError),
}

pub use parse::ParseError;
pub use shape::ShapeError;
pub use translate::TranslateError;

// ============ Advanced: AST Access ============

/// Low-level AST types and passes (for custom front-ends or introspection)
pub mod advanced {
    pub use crate::ast::script::{
        BinaryOp, DeclarationKind, Expr as ScriptExpr, Function, FunctionBody, LogicalOp, Program,
        Property, Statement, UnaryOp,
    };
    pub use crate::parse::parse;
    pub use crate::shape::{validate, validate_body_expr, validate_function};
    pub use crate::translate::translate;
}
