//! Tagged secret values.
//!
//! Secret payloads are untyped JSON. Values keep their JSON type until a
//! materializer asks for text, and only scalars can be turned into text.

use serde::Serialize;

use crate::error::SecretError;

/// A single value from a secret payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SecretValue {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
    Null,
    /// Arrays and objects. Kept so callers can report them, never coerced.
    Nested(serde_json::Value),
}

impl SecretValue {
    /// Coerce to the text a target receives.
    ///
    /// `Null` becomes the empty string. Nested values are rejected.
    pub fn coerce(&self, key: &str) -> Result<String, SecretError> {
        match self {
            Self::Text(s) => Ok(s.clone()),
            Self::Number(n) => Ok(n.to_string()),
            Self::Bool(b) => Ok(b.to_string()),
            Self::Null => Ok(String::new()),
            Self::Nested(_) => Err(SecretError::NotScalar {
                key: key.to_string(),
            }),
        }
    }

    /// Whether the value coerces to an empty string.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Null => true,
            _ => false,
        }
    }
}

impl From<serde_json::Value> for SecretValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::String(s) => Self::Text(s),
            Value::Number(n) => Self::Number(n),
            Value::Bool(b) => Self::Bool(b),
            Value::Null => Self::Null,
            nested @ (Value::Array(_) | Value::Object(_)) => Self::Nested(nested),
        }
    }
}

impl From<&str> for SecretValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SecretValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}
