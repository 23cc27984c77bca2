//! Helpers for building predicate functions in code
//!
//! Closures can't be turned back into source, so callers that assemble
//! filters at runtime build the function literal directly and hand it to
//! [`compile_expr`](crate::compile_expr). The result is the same tree the
//! parser would produce for the equivalent source, and prints as such.
//!
//! ```ignore
//! use predsql::builder::{arrow, field, lit};
//!
//! let f = arrow(field("age").gt(lit(18)).and(field("name").not_equals(lit(None::<&str>))));
//! assert_eq!(f.to_string(), "(x) => (x.age > 18) && (x.name !== null)");
//! ```

use crate::ast::Value;
use crate::ast::script::{BinaryOp, Function, FunctionBody, LogicalOp};

pub use crate::ast::script::Expr;

/// Name of the row parameter in built functions
pub const ROW: &str = "x";

/// `x.name`
pub fn field(name: &str) -> Expr {
    Expr::Identifier(ROW.into()).member(name)
}

/// A literal constant
pub fn lit(value: impl Into<Value>) -> Expr {
    Expr::Literal(value.into())
}

/// `x => body`
pub fn arrow(body: Expr) -> Expr {
    Expr::Function(Function {
        name: None,
        params: vec![ROW.into()],
        body: FunctionBody::Expression(Box::new(body)),
        is_arrow: true,
        is_async: false,
        is_generator: false,
    })
}

impl Expr {
    pub fn equals(self, rhs: Expr) -> Self {
        self.binary(BinaryOp::StrictEq, rhs)
    }

    pub fn not_equals(self, rhs: Expr) -> Self {
        self.binary(BinaryOp::StrictNe, rhs)
    }

    pub fn gt(self, rhs: Expr) -> Self {
        self.binary(BinaryOp::Gt, rhs)
    }

    pub fn ge(self, rhs: Expr) -> Self {
        self.binary(BinaryOp::Ge, rhs)
    }

    pub fn lt(self, rhs: Expr) -> Self {
        self.binary(BinaryOp::Lt, rhs)
    }

    pub fn le(self, rhs: Expr) -> Self {
        self.binary(BinaryOp::Le, rhs)
    }

    pub fn and(self, rhs: Expr) -> Self {
        self.logical(LogicalOp::And, rhs)
    }

    pub fn or(self, rhs: Expr) -> Self {
        self.logical(LogicalOp::Or, rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ParameterProvider, ParameterWriter, QueryStringBuilder, compile, compile_expr};

    #[test]
    fn built_function_matches_source() {
        let built = arrow(
            field("a")
                .equals(lit(1))
                .or(field("b").equals(lit(2)).and(field("c").equals(lit(Value::Null)))),
        );
        let from_built = compile_expr(&built, &mut ParameterProvider::new()).unwrap();
        let from_source = compile(&built.to_string()).unwrap();
        assert_eq!(from_built, from_source);
        assert_eq!(
            from_built.to_raw_string(),
            "[a] = @p0 OR [b] = @p1 AND [c] = @p2"
        );
        assert_eq!(from_built.parameters().len(), 3);
    }

    #[test]
    fn prints_as_source() {
        let built = arrow(
            field("age")
                .gt(lit(18))
                .and(field("name").not_equals(lit(None::<&str>))),
        );
        assert_eq!(built.to_string(), "(x) => (x.age > 18) && (x.name !== null)");
    }

    #[test]
    fn bare_expression_is_not_a_function() {
        let err = compile_expr(&field("a").equals(lit(1)), &mut ParameterProvider::new())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported function shape: Unexpected expression type: BinaryExpression"
        );
    }
}
