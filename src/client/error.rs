//! Dispatch error definitions.

use thiserror::Error;

use crate::client::transport::TransportError;
use crate::contract::Method;
use crate::query::QueryError;
use crate::routing::RouteError;
use crate::schema::SchemaViolation;

/// Errors that prevent a dispatch from producing a result.
///
/// HTTP error statuses are not represented here; a 404 or 500 is an
/// ordinary [`DispatchResult`](crate::client::DispatchResult).
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No declared route matches the method and path.
    #[error("Route not found: {0}")]
    RouteNotFound(#[from] RouteError),

    /// A body was supplied for a GET route.
    #[error("{method} {path} does not accept a request body")]
    BodyNotAllowed { method: Method, path: String },

    /// Request body could not be serialized to JSON.
    #[error("Body serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Query object could not be encoded.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The transport call itself failed; the inner error is untouched.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Opt-in response validation rejected the body.
    #[error("Response {status} does not match its declared shape: {violation}")]
    ResponseValidation {
        status: u16,
        violation: SchemaViolation,
    },

    /// Response body could not be deserialized into the requested type.
    #[error("Response decode failed: {0}")]
    Decode(#[source] serde_json::Error),
}

impl DispatchError {
    pub fn is_route_not_found(&self) -> bool {
        matches!(self, DispatchError::RouteNotFound(RouteError::NotFound { .. }))
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::RouteNotFound(_) => "route_not_found",
            DispatchError::BodyNotAllowed { .. } => "body_not_allowed",
            DispatchError::Serialize(_) => "serialize",
            DispatchError::Query(_) => "query",
            DispatchError::Transport(_) => "transport",
            DispatchError::ResponseValidation { .. } => "response_validation",
            DispatchError::Decode(_) => "decode",
        }
    }
}
