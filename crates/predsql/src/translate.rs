//! Translate a validated script expression into a predicate tree
//!
//! Depth-first and left to right. Placeholder names are reserved as literals
//! are reached, so their numbering follows the order literals appear in the
//! source. The provider is the only state threaded through the walk.

use thiserror::Error;

use crate::ast::predicate::{Comparator, Field, Literal, LogicalOperator, Node};
use crate::ast::script::{BinaryOp, Expr, LogicalOp, Property};
use crate::ast::Value;
use crate::param::ParameterProvider;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslateError {
    #[error("Unknown expression to handle: {0}")]
    UnknownExpression(&'static str),

    #[error("Unhandled operator: {0}")]
    UnhandledOperator(&'static str),

    #[error("Computed member access is not supported; use `x.field`")]
    ComputedMember,
}

type Result<T> = std::result::Result<T, TranslateError>;

/// Translate an expression, reserving placeholders from `params`
pub fn translate(expr: &Expr, params: &mut ParameterProvider) -> Result<Node> {
    match expr {
        Expr::Logical(left, op, right) => translate_logical(left, *op, right, params),
        Expr::Binary(left, op, right) => translate_binary(left, *op, right, params),
        Expr::Member(_, property) => translate_member(property),
        Expr::Literal(value) => Ok(translate_literal(value, params)),
        Expr::Identifier(_)
        | Expr::Call(..)
        | Expr::Unary(..)
        | Expr::Conditional(..)
        | Expr::Function(_) => Err(TranslateError::UnknownExpression(expr.kind())),
    }
}

fn translate_logical(
    left: &Expr,
    op: LogicalOp,
    right: &Expr,
    params: &mut ParameterProvider,
) -> Result<Node> {
    let operator = match op {
        LogicalOp::And => LogicalOperator::And,
        LogicalOp::Or => LogicalOperator::Or,
        LogicalOp::Nullish => return Err(TranslateError::UnhandledOperator(op.token())),
    };
    let left = translate(left, params)?;
    let right = translate(right, params)?;
    Ok(Node::combine(left, operator, right))
}

fn translate_binary(
    left: &Expr,
    op: BinaryOp,
    right: &Expr,
    params: &mut ParameterProvider,
) -> Result<Node> {
    let comparator = comparator_for(op)?;
    let left = translate(left, params)?;
    let right = translate(right, params)?;
    Ok(Node::comparison(left, comparator, right))
}

fn comparator_for(op: BinaryOp) -> Result<Comparator> {
    match op {
        BinaryOp::Eq | BinaryOp::StrictEq => Ok(Comparator::Eq),
        BinaryOp::Ne | BinaryOp::StrictNe => Ok(Comparator::Neq),
        BinaryOp::Gt => Ok(Comparator::Gt),
        BinaryOp::Ge => Ok(Comparator::Gte),
        BinaryOp::Lt => Ok(Comparator::Lt),
        BinaryOp::Le => Ok(Comparator::Lte),
        BinaryOp::Add
        | BinaryOp::Sub
        | BinaryOp::Mul
        | BinaryOp::Div
        | BinaryOp::Mod
        | BinaryOp::BitAnd
        | BinaryOp::BitOr
        | BinaryOp::BitXor
        | BinaryOp::Shl
        | BinaryOp::Shr => Err(TranslateError::UnhandledOperator(op.token())),
    }
}

// The object side is not checked: `x.a`, `y.a` and `x.b.a` all become [a].
fn translate_member(property: &Property) -> Result<Node> {
    match property {
        Property::Static(name) => Ok(Node::Field(Field::aliased(name.as_str(), ""))),
        Property::Computed(_) => Err(TranslateError::ComputedMember),
    }
}

fn translate_literal(value: &Value, params: &mut ParameterProvider) -> Node {
    let name = params.reserve_parameter_name();
    log::trace!("bound {name} = {value:?}");
    Node::Literal(Literal::new(name, value.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::predicate::{ParameterWriter, QueryStringBuilder};

    fn x() -> Expr {
        Expr::Identifier("x".into())
    }

    fn lit(v: impl Into<Value>) -> Expr {
        Expr::Literal(v.into())
    }

    #[test]
    fn comparison_maps_each_operator() {
        let cases = [
            (BinaryOp::Eq, "="),
            (BinaryOp::StrictEq, "="),
            (BinaryOp::Ne, "!="),
            (BinaryOp::StrictNe, "!="),
            (BinaryOp::Gt, ">"),
            (BinaryOp::Ge, ">="),
            (BinaryOp::Lt, "<"),
            (BinaryOp::Le, "<="),
        ];
        for (op, sql) in cases {
            let expr = x().member("f").binary(op, lit(1));
            let node = translate(&expr, &mut ParameterProvider::new()).unwrap();
            assert_eq!(node.to_raw_string(), format!("[f] {sql} @p0"));
        }
    }

    #[test]
    fn literals_number_left_to_right() {
        // 1 == x.a && x.b == 2: the left literal is reached first
        let expr = lit(1)
            .binary(BinaryOp::Eq, x().member("a"))
            .logical(LogicalOp::And, x().member("b").binary(BinaryOp::Eq, lit(2)));
        let node = translate(&expr, &mut ParameterProvider::new()).unwrap();
        assert_eq!(node.to_raw_string(), "@p0 = [a] AND [b] = @p1");
        let values: Vec<_> = node.parameters().into_iter().map(|p| p.value).collect();
        assert_eq!(values, vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn shared_provider_continues_numbering() {
        let mut params = ParameterProvider::new();
        params.reserve_parameter_name();
        let expr = x().member("a").binary(BinaryOp::Eq, lit("v"));
        let node = translate(&expr, &mut params).unwrap();
        assert_eq!(node.to_raw_string(), "[a] = @p1");
        assert_eq!(params.reserved(), 2);
    }

    #[test]
    fn rejects_unsupported_operators() {
        let expr = x().member("a").binary(BinaryOp::BitAnd, lit(1));
        assert_eq!(
            translate(&expr, &mut ParameterProvider::new()),
            Err(TranslateError::UnhandledOperator("&"))
        );
        let expr = x().member("a").logical(LogicalOp::Nullish, lit(1));
        assert_eq!(
            translate(&expr, &mut ParameterProvider::new()),
            Err(TranslateError::UnhandledOperator("??"))
        );
    }

    #[test]
    fn rejects_unknown_expressions() {
        let expr = x().binary(BinaryOp::Eq, lit(1));
        assert_eq!(
            translate(&expr, &mut ParameterProvider::new()),
            Err(TranslateError::UnknownExpression("Identifier"))
        );
        let call = Expr::Call(Box::new(x().member("f")), vec![]);
        let expr = call.binary(BinaryOp::Eq, lit(1));
        assert_eq!(
            translate(&expr, &mut ParameterProvider::new()),
            Err(TranslateError::UnknownExpression("CallExpression"))
        );
    }

    #[test]
    fn rejects_computed_members() {
        let computed = Expr::Member(Box::new(x()), Property::Computed(Box::new(lit("a"))));
        let expr = computed.binary(BinaryOp::Eq, lit(1));
        assert_eq!(
            translate(&expr, &mut ParameterProvider::new()),
            Err(TranslateError::ComputedMember)
        );
    }
}
