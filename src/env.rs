//! Environment variable abstraction for testability.
//!
//! Production code uses [`Env::real()`] which delegates to [`std::env::var`].
//! Tests use [`Env::mock()`] backed by a `HashMap`, so config overrides can
//! be exercised without touching the process environment.

use std::collections::HashMap;
use std::str::FromStr;

/// Environment variable reader.
#[derive(Clone, Debug)]
pub struct Env {
    overrides: Option<HashMap<String, String>>,
}

/// Outcome of reading and parsing a typed variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed<T> {
    /// The variable is not set.
    Missing,
    /// The variable is set and parsed.
    Value(T),
    /// The variable is set but does not parse; carries the raw text.
    Invalid(String),
}

impl Env {
    /// Create an `Env` that reads from the real process environment.
    pub fn real() -> Self {
        Self { overrides: None }
    }

    /// Create an `Env` backed by explicit key-value pairs.
    pub fn mock(vars: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            overrides: Some(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Look up an environment variable by name.
    pub fn var(&self, name: &str) -> Result<String, std::env::VarError> {
        match &self.overrides {
            Some(map) => map.get(name).cloned().ok_or(std::env::VarError::NotPresent),
            None => std::env::var(name),
        }
    }

    /// Look up a variable and parse it into `T`. Surrounding whitespace is ignored.
    pub fn parsed<T: FromStr>(&self, name: &str) -> Parsed<T> {
        match self.var(name) {
            Ok(raw) => match raw.trim().parse() {
                Ok(value) => Parsed::Value(value),
                Err(_) => Parsed::Invalid(raw),
            },
            Err(_) => Parsed::Missing,
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::real()
    }
}
