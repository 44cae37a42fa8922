//! Shape descriptors and the optional validation capability.
//!
//! # Data Flow
//! ```text
//! Contract declaration:
//!     Route.query / Route.body / Route.responses[status]
//!     → Shape (Arc<dyn Schema>)
//!
//! Dispatch (only when validate_responses = true):
//!     DispatchResult.status
//!     → route.responses[status] or Shape::any()
//!     → Schema::validate(body)
//! ```
//!
//! # Design Decisions
//! - The schema language is opaque: anything implementing `Schema` works
//! - Validation is opt-in; by default shapes are declarations only
//! - `JsonKind` is the one built-in schema, enough for contract files

pub mod kind;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

pub use kind::JsonKind;

/// A value failed to satisfy a shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("value does not satisfy shape '{shape}': {reason}")]
pub struct SchemaViolation {
    pub shape: String,
    pub reason: String,
}

impl SchemaViolation {
    pub fn new(shape: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            shape: shape.into(),
            reason: reason.into(),
        }
    }
}

/// Describes, and optionally validates, a payload shape.
pub trait Schema: Send + Sync + fmt::Debug {
    /// Human-readable name used in diagnostics.
    fn name(&self) -> &str;

    /// Checks a value against this shape.
    fn validate(&self, value: &Value) -> Result<(), SchemaViolation>;
}

/// Cheaply clonable handle to a shape descriptor.
#[derive(Clone)]
pub struct Shape(Arc<dyn Schema>);

impl Shape {
    pub fn new(schema: impl Schema + 'static) -> Self {
        Self(Arc::new(schema))
    }

    /// The "unknown/untyped" shape; accepts every value.
    pub fn any() -> Self {
        Self::new(JsonKind::Any)
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    pub fn validate(&self, value: &Value) -> Result<(), SchemaViolation> {
        self.0.validate(value)
    }

    pub fn schema(&self) -> &dyn Schema {
        self.0.as_ref()
    }
}

impl From<JsonKind> for Shape {
    fn from(kind: JsonKind) -> Self {
        Shape::new(kind)
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Shape").field(&self.0.name()).finish()
    }
}
