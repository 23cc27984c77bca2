//! Statement composition around compiled predicates
//!
//! Produces a [`Command`]: SQL text plus the ordered bindings the execution
//! layer passes alongside it. Table and column names are bracket-quoted the
//! same way predicate fields are.

use thiserror::Error;

use crate::ast::Value;
use crate::ast::predicate::{
    Field, Node, ParameterWriter, QueryStringBuilder, write_quoted_ident,
};
use crate::param::{Parameter, ParameterProvider};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("UPDATE of {0} has no assignments")]
    EmptyAssignments(String),
}

/// SQL text with the parameters it references
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub text: String,
    pub parameters: Vec<Parameter>,
}

/// `SELECT <fields> FROM <table> [WHERE <predicate>]`
#[derive(Debug, Clone)]
pub struct SelectQuery {
    table: String,
    fields: Vec<Field>,
    filter: Option<Node>,
}

impl SelectQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            fields: Vec::new(),
            filter: None,
        }
    }

    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(Field::new(name));
        self
    }

    pub fn fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(names.into_iter().map(Field::new));
        self
    }

    pub fn filter(mut self, predicate: Node) -> Self {
        self.filter = Some(predicate);
        self
    }

    pub fn build(&self) -> Command {
        let mut text = String::from("SELECT ");
        if self.fields.is_empty() {
            text.push('*');
        } else {
            for (i, field) in self.fields.iter().enumerate() {
                if i > 0 {
                    text.push_str(", ");
                }
                field.write_raw(&mut text);
            }
        }
        text.push_str(" FROM ");
        write_quoted_ident(&mut text, &self.table);

        let mut parameters = Vec::new();
        if let Some(filter) = &self.filter {
            text.push_str(" WHERE ");
            filter.write_raw(&mut text);
            filter.write_parameters(&mut parameters);
        }
        Command { text, parameters }
    }
}

/// `INSERT INTO <table> VALUES (...)`
#[derive(Debug, Clone)]
pub struct InsertQuery {
    table: String,
    values: Vec<Value>,
}

impl InsertQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            values: Vec::new(),
        }
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.values.push(value.into());
        self
    }

    pub fn values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.values.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn build(&self, params: &mut ParameterProvider) -> Command {
        let mut text = String::from("INSERT INTO ");
        write_quoted_ident(&mut text, &self.table);
        text.push_str(" VALUES (");
        let mut parameters = Vec::with_capacity(self.values.len());
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                text.push_str(", ");
            }
            let name = params.reserve_parameter_name();
            text.push_str(&name);
            parameters.push(Parameter::new(name, value.clone()));
        }
        text.push(')');
        Command { text, parameters }
    }
}

/// `UPDATE <table> SET <field> = <value>, ... [WHERE <predicate>]`
#[derive(Debug, Clone)]
pub struct UpdateQuery {
    table: String,
    assignments: Vec<(Field, Value)>,
    filter: Option<Node>,
}

impl UpdateQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            assignments: Vec::new(),
            filter: None,
        }
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.assignments.push((Field::new(field), value.into()));
        self
    }

    pub fn filter(mut self, predicate: Node) -> Self {
        self.filter = Some(predicate);
        self
    }

    /// Assignment placeholders come from `params`. When the filter was
    /// compiled with the same provider, every name in the command is unique.
    pub fn build(&self, params: &mut ParameterProvider) -> Result<Command, QueryError> {
        if self.assignments.is_empty() {
            return Err(QueryError::EmptyAssignments(self.table.clone()));
        }
        let mut text = String::from("UPDATE ");
        write_quoted_ident(&mut text, &self.table);
        text.push_str(" SET ");
        let mut parameters = Vec::new();
        for (i, (field, value)) in self.assignments.iter().enumerate() {
            if i > 0 {
                text.push_str(", ");
            }
            let name = params.reserve_parameter_name();
            field.write_raw(&mut text);
            text.push_str(" = ");
            text.push_str(&name);
            parameters.push(Parameter::new(name, value.clone()));
        }
        if let Some(filter) = &self.filter {
            text.push_str(" WHERE ");
            filter.write_raw(&mut text);
            filter.write_parameters(&mut parameters);
        }
        Ok(Command { text, parameters })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile_with;

    #[test]
    fn select_with_filter() {
        let mut params = ParameterProvider::new();
        let filter =
            compile_with("x => x.kind == 'merchant' && x.gold > 100", &mut params).unwrap();
        let command = SelectQuery::new("entities")
            .fields(["name", "gold"])
            .filter(filter)
            .build();
        assert_eq!(
            command.text,
            "SELECT [name], [gold] FROM [entities] WHERE [kind] = @p0 AND [gold] > @p1"
        );
        assert_eq!(
            command.parameters,
            vec![Parameter::new("@p0", "merchant"), Parameter::new("@p1", 100)]
        );
    }

    #[test]
    fn select_everything() {
        let command = SelectQuery::new("entities").build();
        assert_eq!(command.text, "SELECT * FROM [entities]");
        assert!(command.parameters.is_empty());
    }

    #[test]
    fn insert_reserves_one_name_per_value() {
        let mut params = ParameterProvider::new();
        let command = InsertQuery::new("users")
            .value(1)
            .values(["ann", "bob"])
            .value(None::<i64>)
            .build(&mut params);
        assert_eq!(
            command.text,
            "INSERT INTO [users] VALUES (@p0, @p1, @p2, @p3)"
        );
        assert_eq!(command.parameters[3], Parameter::new("@p3", Value::Null));
        assert_eq!(params.reserved(), 4);
    }

    #[test]
    fn update_shares_numbering_with_filter() {
        let mut params = ParameterProvider::new();
        let filter = compile_with("x => x.id === 7 || x.id === 8", &mut params).unwrap();
        let command = UpdateQuery::new("users")
            .set("name", "carol")
            .filter(filter)
            .build(&mut params)
            .unwrap();
        assert_eq!(
            command.text,
            "UPDATE [users] SET [name] = @p2 WHERE [id] = @p0 OR [id] = @p1"
        );
        let names: Vec<_> = command
            .parameters
            .iter()
            .map(|p| p.placeholder_name.as_str())
            .collect();
        assert_eq!(names, ["@p2", "@p0", "@p1"]);
    }

    #[test]
    fn update_without_assignments_fails() {
        let err = UpdateQuery::new("users")
            .build(&mut ParameterProvider::new())
            .unwrap_err();
        assert_eq!(err, QueryError::EmptyAssignments("users".into()));
    }
}
