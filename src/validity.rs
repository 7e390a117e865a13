//! Runtime type checks for dynamic values
//!
//! Dynamic inputs (JSON configuration, keyword arguments handed to factories)
//! are `serde_json::Value`s. This module names their kinds and validates
//! them against an expected set.

use serde_json::Value;
use std::fmt;

use crate::error::{Error, Result};

/// Runtime kind of a dynamic value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Int,
    Float,
    Str,
    List,
    Map,
}

impl Kind {
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::Str => "str",
            Kind::List => "list",
            Kind::Map => "map",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Return the runtime kind of a value
pub fn kind_of(value: &Value) -> Kind {
    match value {
        Value::Null => Kind::Null,
        Value::Bool(_) => Kind::Bool,
        Value::Number(n) if n.is_i64() || n.is_u64() => Kind::Int,
        Value::Number(_) => Kind::Float,
        Value::String(_) => Kind::Str,
        Value::Array(_) => Kind::List,
        Value::Object(_) => Kind::Map,
    }
}

/// Fail with a type error if `value` is not of one of the `expected` kinds.
///
/// Expecting `Float` implicitly accepts `Int` as well. `varname` is only
/// used to build the error message.
pub fn check_type_validity(value: &Value, expected: &[Kind], varname: &str) -> Result<()> {
    let mut valid: Vec<Kind> = expected.to_vec();
    if valid.contains(&Kind::Float) && !valid.contains(&Kind::Int) {
        valid.push(Kind::Int);
    }

    let found = kind_of(value);
    if valid.contains(&found) {
        return Ok(());
    }

    let names: Vec<&str> = valid.iter().map(Kind::name).collect();
    Err(Error::type_error(format!(
        "Expected '{}' to be of type {}, not {}",
        varname,
        names.join(" or "),
        found
    )))
}
