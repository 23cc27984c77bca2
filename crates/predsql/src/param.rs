//! Bound parameters and placeholder naming

use serde::Serialize;

use crate::ast::Value;

pub const DEFAULT_PREFIX: &str = "@";

/// A single bound value, identified by its placeholder name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub placeholder_name: String,
    pub value: Value,
}

impl Parameter {
    pub fn new(placeholder_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            placeholder_name: placeholder_name.into(),
            value: value.into(),
        }
    }
}

/// Hands out `@p0`, `@p1`, ... in order.
///
/// A provider is scoped to one compilation, or to one composed statement when
/// several fragments must share numbering. It is not meant to be shared across
/// threads; pass it down by `&mut`.
#[derive(Debug, Clone)]
pub struct ParameterProvider {
    count: usize,
    prefix: String,
}

impl Default for ParameterProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterProvider {
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_PREFIX)
    }

    /// Provider whose default prefix is `prefix` instead of `@`
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            count: 0,
            prefix: prefix.into(),
        }
    }

    /// Reserve the next name using this provider's prefix
    pub fn reserve_parameter_name(&mut self) -> String {
        let n = self.count;
        self.count += 1;
        format!("{}p{n}", self.prefix)
    }

    /// Reserve the next name with an explicit prefix. Shares the counter.
    pub fn reserve_parameter_name_with(&mut self, prefix: &str) -> String {
        let n = self.count;
        self.count += 1;
        format!("{prefix}p{n}")
    }

    /// Number of names reserved so far
    pub fn reserved(&self) -> usize {
        self.count
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}
