//! Pretty printing for the script AST
//!
//! `Display` re-emits source the parser accepts. Compound operands are always
//! parenthesized, so printing then reparsing gives back an equal tree.

use std::fmt::{self, Display};

use crate::ast::Value;
use crate::ast::script::{
    DeclarationKind, Expr, Function, FunctionBody, Program, Property, Statement,
};

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n:?}"),
            Value::String(s) => write!(f, "\"{}\"", escape_string(s)),
        }
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_statements(f, &self.body)
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Expression(expr) => write!(f, "{expr};"),
            Statement::Return(Some(expr)) => write!(f, "return {expr};"),
            Statement::Return(None) => write!(f, "return;"),
            Statement::VariableDeclaration { kind, name, init } => {
                let keyword = match kind {
                    DeclarationKind::Let => "let",
                    DeclarationKind::Const => "const",
                    DeclarationKind::Var => "var",
                };
                match init {
                    Some(init) => write!(f, "{keyword} {name} = {init};"),
                    None => write!(f, "{keyword} {name};"),
                }
            }
            Statement::Block(body) => {
                write!(f, "{{ ")?;
                write_statements(f, body)?;
                write!(f, " }}")
            }
            Statement::Empty => write!(f, ";"),
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Identifier(name) => write!(f, "{name}"),
            Expr::Literal(value) => write!(f, "{value}"),
            Expr::Member(object, property) => {
                write_operand(f, object, needs_parens_as_receiver(object))?;
                match property {
                    Property::Static(name) => write!(f, ".{name}"),
                    Property::Computed(key) => write!(f, "[{key}]"),
                }
            }
            Expr::Call(callee, args) => {
                write_operand(f, callee, needs_parens_as_receiver(callee))?;
                write!(f, "(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Expr::Unary(op, operand) => {
                write!(f, "{}", op.token())?;
                write_operand(f, operand, needs_parens_as_operand(operand))
            }
            Expr::Binary(lhs, op, rhs) => {
                write_operand(f, lhs, needs_parens_as_operand(lhs))?;
                write!(f, " {} ", op.token())?;
                write_operand(f, rhs, needs_parens_as_operand(rhs))
            }
            Expr::Logical(lhs, op, rhs) => {
                write_operand(f, lhs, needs_parens_as_operand(lhs))?;
                write!(f, " {} ", op.token())?;
                write_operand(f, rhs, needs_parens_as_operand(rhs))
            }
            Expr::Conditional(test, consequent, alternate) => {
                for (i, part) in [test, consequent, alternate].into_iter().enumerate() {
                    match i {
                        1 => write!(f, " ? ")?,
                        2 => write!(f, " : ")?,
                        _ => {}
                    }
                    let nested = matches!(**part, Expr::Conditional(..) | Expr::Function(_));
                    write_operand(f, part, nested)?;
                }
                Ok(())
            }
            Expr::Function(function) => write!(f, "{function}"),
        }
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_async {
            write!(f, "async ")?;
        }
        if !self.is_arrow {
            write!(f, "function")?;
            if self.is_generator {
                write!(f, "*")?;
            }
            if let Some(name) = &self.name {
                write!(f, " {name}")?;
            }
        }
        write!(f, "({})", self.params.join(", "))?;
        if self.is_arrow {
            write!(f, " =>")?;
        }
        match &self.body {
            FunctionBody::Block(body) => {
                write!(f, " {{ ")?;
                write_statements(f, body)?;
                write!(f, " }}")
            }
            FunctionBody::Expression(expr) => write!(f, " {expr}"),
        }
    }
}

fn write_statements(f: &mut fmt::Formatter<'_>, statements: &[Statement]) -> fmt::Result {
    for (i, statement) in statements.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{statement}")?;
    }
    Ok(())
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr, parens: bool) -> fmt::Result {
    if parens {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

fn needs_parens_as_operand(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Unary(..)
            | Expr::Binary(..)
            | Expr::Logical(..)
            | Expr::Conditional(..)
            | Expr::Function(_)
    )
}

fn needs_parens_as_receiver(expr: &Expr) -> bool {
    needs_parens_as_operand(expr) || matches!(expr, Expr::Literal(Value::Int(_) | Value::Float(_)))
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use crate::parse::parse;

    fn roundtrip(source: &str) -> String {
        let program = parse(source).unwrap();
        let printed = program.to_string();
        assert_eq!(parse(&printed).unwrap(), program, "reparse of {printed}");
        printed
    }

    #[test]
    fn prints_arrow_predicates() {
        assert_eq!(
            roundtrip("(x => x.a == 2 && x.b === null)"),
            "(x) => (x.a == 2) && (x.b === null);"
        );
    }

    #[test]
    fn keeps_explicit_grouping() {
        assert_eq!(
            roundtrip("x => (x.a == 1 || x.b == 2) && x.c != 'q'"),
            "(x) => ((x.a == 1) || (x.b == 2)) && (x.c != \"q\");"
        );
    }

    #[test]
    fn prints_function_forms() {
        assert_eq!(
            roundtrip("async function* f(x, y) { let z = 1.5; return -z; }"),
            "async function* f(x, y) { let z = 1.5; return -z; };"
        );
        roundtrip("x => x[\"k\"](1, 'two') ? !x.a : ~x.b");
    }
}
