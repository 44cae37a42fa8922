//! Query string codec.
//!
//! # Data Flow
//! ```text
//! Client side:
//!     query (serde_json::Value or T: Serialize)
//!     → encode.rs (flatten with bracket notation, percent-encode)
//!     → "?take=10&filter[tags][0]=a"
//!
//! Receiving side:
//!     "?take=10&filter[tags][0]=a"
//!     → decode.rs (split, percent-decode, rebuild nesting)
//!     → serde_json::Value / T: DeserializeOwned
//! ```
//!
//! # Design Decisions
//! - `Null` means "absent": omitted at every depth, never `k=`
//! - Parameter order is object insertion order (serde_json preserve_order)
//! - Bracket characters are emitted literally; names and values are
//!   percent-encoded as URL components
//! - Pure functions, no state

pub mod decode;
pub mod encode;

use thiserror::Error;

pub use decode::{decode, decode_into, MAX_DEPTH};
pub use encode::{encode, encode_serialize};

/// Errors from the query codec.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Top-level query value is not an object.
    #[error("Query must be an object, got {0}")]
    NotAnObject(&'static str),

    /// Query value could not be converted to JSON.
    #[error("Query serialization failed: {0}")]
    Serialize(serde_json::Error),

    /// Bracket notation is unbalanced or misplaced.
    #[error("Malformed query key '{0}'")]
    MalformedKey(String),

    /// Bracket nesting exceeds [`decode::MAX_DEPTH`].
    #[error("Query key '{key}' nested deeper than {limit} levels")]
    TooDeep { key: String, limit: usize },

    /// The same key is used both as a value and as a container.
    #[error("Conflicting query key '{0}'")]
    Conflict(String),

    /// Percent-decoding produced invalid UTF-8.
    #[error("Invalid percent-encoding in '{0}'")]
    InvalidEncoding(String),

    /// Decoded tree does not fit the target type.
    #[error("Query deserialization failed: {0}")]
    Deserialize(serde_json::Error),
}
