//! Script AST - what the parser produces
//!
//! A small ESTree-shaped tree for function literals and the expressions
//! inside them. It mirrors the source closely and accepts more than the
//! translator supports, so that rejections can name what was found.

use super::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `expr;`
    Expression(Expr),

    /// `return expr;` or bare `return;`
    Return(Option<Expr>),

    /// `let name = expr;`
    VariableDeclaration {
        kind: DeclarationKind,
        name: String,
        init: Option<Expr>,
    },

    /// `{ ... }`
    Block(Vec<Statement>),

    /// `;`
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Let,
    Const,
    Var,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Identifier: `x`, `row`
    Identifier(String),

    /// Literal value: `2`, `"a"`, `true`, `null`
    Literal(Value),

    /// Member access: `x.name` or `x["name"]`
    Member(Box<Expr>, Property),

    /// Call: `f(a, b)`
    Call(Box<Expr>, Vec<Expr>),

    /// Unary operation: `!x`, `-x`
    Unary(UnaryOp, Box<Expr>),

    /// Arithmetic, bitwise or comparison operation: `a == b`, `a & b`
    Binary(Box<Expr>, BinaryOp, Box<Expr>),

    /// Short-circuit operation: `a && b`, `a || b`, `a ?? b`
    Logical(Box<Expr>, LogicalOp, Box<Expr>),

    /// Ternary: `a ? b : c`
    Conditional(Box<Expr>, Box<Expr>, Box<Expr>),

    /// Function literal, either `function` or arrow form
    Function(Function),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    Static(String),
    Computed(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: FunctionBody,
    pub is_arrow: bool,
    pub is_async: bool,
    pub is_generator: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FunctionBody {
    Block(Vec<Statement>),
    /// Concise arrow body: `x => expr`
    Expression(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Equality
    Eq,
    StrictEq,
    Ne,
    StrictNe,

    // Relational
    Lt,
    Le,
    Gt,
    Ge,

    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl BinaryOp {
    pub fn token(self) -> &'static str {
        match self {
            BinaryOp::Eq => "==",
            BinaryOp::StrictEq => "===",
            BinaryOp::Ne => "!=",
            BinaryOp::StrictNe => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::StrictEq
                | BinaryOp::Ne
                | BinaryOp::StrictNe
                | BinaryOp::Lt
                | BinaryOp::Le
                | BinaryOp::Gt
                | BinaryOp::Ge
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
    Nullish,
}

impl LogicalOp {
    pub fn token(self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
            LogicalOp::Nullish => "??",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
    Plus,
    BitNot,
}

impl UnaryOp {
    pub fn token(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::BitNot => "~",
        }
    }
}

impl Statement {
    /// ESTree node kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::Expression(_) => "ExpressionStatement",
            Statement::Return(_) => "ReturnStatement",
            Statement::VariableDeclaration { .. } => "VariableDeclaration",
            Statement::Block(_) => "BlockStatement",
            Statement::Empty => "EmptyStatement",
        }
    }
}

impl Expr {
    /// ESTree node kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Expr::Identifier(_) => "Identifier",
            Expr::Literal(_) => "Literal",
            Expr::Member(..) => "MemberExpression",
            Expr::Call(..) => "CallExpression",
            Expr::Unary(..) => "UnaryExpression",
            Expr::Binary(..) => "BinaryExpression",
            Expr::Logical(..) => "LogicalExpression",
            Expr::Conditional(..) => "ConditionalExpression",
            Expr::Function(f) if f.is_arrow => "ArrowFunctionExpression",
            Expr::Function(_) => "FunctionExpression",
        }
    }

    pub fn member(self, name: impl Into<String>) -> Self {
        Expr::Member(Box::new(self), Property::Static(name.into()))
    }

    pub fn binary(self, op: BinaryOp, rhs: Expr) -> Self {
        Expr::Binary(Box::new(self), op, Box::new(rhs))
    }

    pub fn logical(self, op: LogicalOp, rhs: Expr) -> Self {
        Expr::Logical(Box::new(self), op, Box::new(rhs))
    }
}
