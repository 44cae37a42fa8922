//! JSON kind schema.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::{Schema, SchemaViolation};

/// Matches a value by its JSON kind only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonKind {
    Any,
    Object,
    Array,
    String,
    Number,
    Boolean,
    Null,
}

impl JsonKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JsonKind::Any => "any",
            JsonKind::Object => "object",
            JsonKind::Array => "array",
            JsonKind::String => "string",
            JsonKind::Number => "number",
            JsonKind::Boolean => "boolean",
            JsonKind::Null => "null",
        }
    }

    /// Kind of a concrete value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => JsonKind::Null,
            Value::Bool(_) => JsonKind::Boolean,
            Value::Number(_) => JsonKind::Number,
            Value::String(_) => JsonKind::String,
            Value::Array(_) => JsonKind::Array,
            Value::Object(_) => JsonKind::Object,
        }
    }
}

impl FromStr for JsonKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(JsonKind::Any),
            "object" => Ok(JsonKind::Object),
            "array" => Ok(JsonKind::Array),
            "string" => Ok(JsonKind::String),
            "number" => Ok(JsonKind::Number),
            "boolean" => Ok(JsonKind::Boolean),
            "null" => Ok(JsonKind::Null),
            other => Err(format!("unknown shape kind '{}'", other)),
        }
    }
}

impl Schema for JsonKind {
    fn name(&self) -> &str {
        self.as_str()
    }

    fn validate(&self, value: &Value) -> Result<(), SchemaViolation> {
        if *self == JsonKind::Any {
            return Ok(());
        }
        let actual = JsonKind::of(value);
        if actual == *self {
            Ok(())
        } else {
            Err(SchemaViolation::new(
                self.as_str(),
                format!("expected {}, got {}", self.as_str(), actual.as_str()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_of() {
        assert_eq!(JsonKind::of(&json!({})), JsonKind::Object);
        assert_eq!(JsonKind::of(&json!("x")), JsonKind::String);
        assert_eq!(JsonKind::of(&json!(1.5)), JsonKind::Number);
        assert_eq!(JsonKind::of(&json!(null)), JsonKind::Null);
    }

    #[test]
    fn test_validate_mismatch() {
        let err = JsonKind::Object.validate(&json!([1])).unwrap_err();
        assert_eq!(err.reason, "expected object, got array");
        assert!(JsonKind::Array.validate(&json!([1])).is_ok());
    }

    #[test]
    fn test_parse_kind_names() {
        assert_eq!("boolean".parse::<JsonKind>().unwrap(), JsonKind::Boolean);
        assert!("Object".parse::<JsonKind>().is_err());
    }
}
