//! Predicate AST - what the translator produces
//!
//! Every node renders to raw SQL text and reports the parameters it binds.
//! Rendering and parameter collection walk children in the same order, so
//! the placeholders in the text always line up with `parameters()`.

use std::fmt;

use super::Value;
use crate::param::Parameter;

/// Renders a node to raw SQL text
pub trait QueryStringBuilder {
    fn write_raw(&self, out: &mut String);

    fn to_raw_string(&self) -> String {
        let mut out = String::new();
        self.write_raw(&mut out);
        out
    }
}

/// Reports the parameters a node binds, in rendering order
pub trait ParameterWriter {
    fn write_parameters(&self, _out: &mut Vec<Parameter>) {}

    fn parameters(&self) -> Vec<Parameter> {
        let mut out = Vec::new();
        self.write_parameters(&mut out);
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Field(Field),
    Literal(Literal),
    Comparator(Comparator),
    Operator(LogicalOperator),
    Comparison(ComparisonPredicate),
    Compound(CompoundPredicate),
}

/// Column reference: `[name]` or `[alias].[name]`
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub object_alias: Option<String>,
}

/// A bound constant; renders as its placeholder
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub placeholder_name: String,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

/// `<left> <comparator> <right>`
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonPredicate {
    pub left: Box<Node>,
    pub comparator: Comparator,
    pub right: Box<Node>,
}

/// Flat run of operands interleaved with logical operators, joined by spaces.
/// Children render in the order given; no precedence is applied here.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundPredicate {
    pub content: Vec<Node>,
}

// ============ Constructors ============

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            object_alias: None,
        }
    }

    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        Self {
            name: name.into(),
            object_alias: (!alias.is_empty()).then_some(alias),
        }
    }
}

impl Literal {
    pub fn new(placeholder_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            placeholder_name: placeholder_name.into(),
            value: value.into(),
        }
    }
}

impl Comparator {
    pub fn as_sql(self) -> &'static str {
        match self {
            Comparator::Eq => "=",
            Comparator::Neq => "!=",
            Comparator::Gt => ">",
            Comparator::Gte => ">=",
            Comparator::Lt => "<",
            Comparator::Lte => "<=",
        }
    }
}

impl LogicalOperator {
    pub fn as_sql(self) -> &'static str {
        match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
        }
    }
}

impl ComparisonPredicate {
    pub fn new(left: Node, comparator: Comparator, right: Node) -> Self {
        Self {
            left: Box::new(left),
            comparator,
            right: Box::new(right),
        }
    }
}

impl CompoundPredicate {
    pub fn new(content: Vec<Node>) -> Self {
        Self { content }
    }
}

impl Node {
    pub fn field(name: impl Into<String>) -> Self {
        Node::Field(Field::new(name))
    }

    pub fn literal(placeholder_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Node::Literal(Literal::new(placeholder_name, value))
    }

    pub fn comparison(left: Node, comparator: Comparator, right: Node) -> Self {
        Node::Comparison(ComparisonPredicate::new(left, comparator, right))
    }

    /// `left <op> right` as a three-element compound
    pub fn combine(left: Node, op: LogicalOperator, right: Node) -> Self {
        Node::Compound(CompoundPredicate::new(vec![left, Node::Operator(op), right]))
    }
}

// ============ Rendering ============

/// Bracket-quote an identifier, doubling any closing bracket
pub(crate) fn write_quoted_ident(out: &mut String, ident: &str) {
    out.push('[');
    for c in ident.chars() {
        if c == ']' {
            out.push_str("]]");
        } else {
            out.push(c);
        }
    }
    out.push(']');
}

impl QueryStringBuilder for Field {
    fn write_raw(&self, out: &mut String) {
        if let Some(alias) = &self.object_alias {
            write_quoted_ident(out, alias);
            out.push('.');
        }
        write_quoted_ident(out, &self.name);
    }
}

impl QueryStringBuilder for Literal {
    fn write_raw(&self, out: &mut String) {
        out.push_str(&self.placeholder_name);
    }
}

impl QueryStringBuilder for Comparator {
    fn write_raw(&self, out: &mut String) {
        out.push_str(self.as_sql());
    }
}

impl QueryStringBuilder for LogicalOperator {
    fn write_raw(&self, out: &mut String) {
        out.push_str(self.as_sql());
    }
}

impl QueryStringBuilder for ComparisonPredicate {
    fn write_raw(&self, out: &mut String) {
        self.left.write_raw(out);
        out.push(' ');
        self.comparator.write_raw(out);
        out.push(' ');
        self.right.write_raw(out);
    }
}

impl QueryStringBuilder for CompoundPredicate {
    fn write_raw(&self, out: &mut String) {
        for (i, item) in self.content.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            item.write_raw(out);
        }
    }
}

impl QueryStringBuilder for Node {
    fn write_raw(&self, out: &mut String) {
        match self {
            Node::Field(field) => field.write_raw(out),
            Node::Literal(literal) => literal.write_raw(out),
            Node::Comparator(comparator) => comparator.write_raw(out),
            Node::Operator(op) => op.write_raw(out),
            Node::Comparison(predicate) => predicate.write_raw(out),
            Node::Compound(predicate) => predicate.write_raw(out),
        }
    }
}

// ============ Parameters ============

impl ParameterWriter for Field {}

impl ParameterWriter for Comparator {}

impl ParameterWriter for LogicalOperator {}

impl ParameterWriter for Literal {
    fn write_parameters(&self, out: &mut Vec<Parameter>) {
        out.push(Parameter::new(
            self.placeholder_name.clone(),
            self.value.clone(),
        ));
    }
}

impl ParameterWriter for ComparisonPredicate {
    fn write_parameters(&self, out: &mut Vec<Parameter>) {
        self.left.write_parameters(out);
        self.comparator.write_parameters(out);
        self.right.write_parameters(out);
    }
}

impl ParameterWriter for CompoundPredicate {
    fn write_parameters(&self, out: &mut Vec<Parameter>) {
        for item in &self.content {
            item.write_parameters(out);
        }
    }
}

impl ParameterWriter for Node {
    fn write_parameters(&self, out: &mut Vec<Parameter>) {
        match self {
            Node::Field(field) => field.write_parameters(out),
            Node::Literal(literal) => literal.write_parameters(out),
            Node::Comparator(comparator) => comparator.write_parameters(out),
            Node::Operator(op) => op.write_parameters(out),
            Node::Comparison(predicate) => predicate.write_parameters(out),
            Node::Compound(predicate) => predicate.write_parameters(out),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_raw_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_renders_bracketed() {
        assert_eq!(Field::new("name").to_raw_string(), "[name]");
        assert_eq!(Field::aliased("name", "u").to_raw_string(), "[u].[name]");
        assert_eq!(Field::aliased("name", "").to_raw_string(), "[name]");
        assert_eq!(Field::new("odd]name").to_raw_string(), "[odd]]name]");
        assert!(Field::new("name").parameters().is_empty());
    }

    #[test]
    fn comparators_render_as_sql() {
        let rendered: Vec<_> = [
            Comparator::Eq,
            Comparator::Neq,
            Comparator::Gt,
            Comparator::Gte,
            Comparator::Lt,
            Comparator::Lte,
        ]
        .iter()
        .map(QueryStringBuilder::to_raw_string)
        .collect();
        assert_eq!(rendered, ["=", "!=", ">", ">=", "<", "<="]);
    }

    #[test]
    fn comparison_collects_left_then_right() {
        let node = Node::comparison(
            Node::literal("@p0", 1),
            Comparator::Lt,
            Node::literal("@p1", 2),
        );
        assert_eq!(node.to_raw_string(), "@p0 < @p1");
        assert_eq!(
            node.parameters(),
            vec![Parameter::new("@p0", 1), Parameter::new("@p1", 2)]
        );
    }

    #[test]
    fn compound_keeps_child_order() {
        let node = Node::combine(
            Node::comparison(Node::field("a"), Comparator::Eq, Node::literal("@p0", 1)),
            LogicalOperator::Or,
            Node::comparison(
                Node::field("b"),
                Comparator::Neq,
                Node::literal("@p1", Value::Null),
            ),
        );
        assert_eq!(node.to_string(), "[a] = @p0 OR [b] != @p1");
        let names: Vec<_> = node
            .parameters()
            .into_iter()
            .map(|p| p.placeholder_name)
            .collect();
        assert_eq!(names, ["@p0", "@p1"]);
    }
}
