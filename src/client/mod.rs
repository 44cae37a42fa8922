//! Client subsystem: dispatcher, transports and results.
//!
//! # Data Flow
//! ```text
//! dispatcher.dispatch(method, "/posts/123/comments", CallArgs { query, body })
//!     → routing::PathMatcher (route must exist, else RouteNotFound)
//!     → query::encode (query object → "?k=v")
//!     → headers: base_headers + Content-Type: application/json
//!     → body: serde_json::to_string (absent/null → no body)
//!     → transport.rs: Transport::invoke(ApiRequest)   [fetch.rs by default]
//!     → response.rs: DispatchResult { status, body } (verbatim)
//! ```
//!
//! # Design Decisions
//! - Exactly one transport call per dispatch; no retries or caching
//! - Status is the discriminant; callers branch on it
//! - Declared response shapes are advisory unless validation is enabled

pub mod dispatcher;
pub mod endpoint;
pub mod error;
pub mod fetch;
pub mod response;
pub mod transport;

pub use dispatcher::{CallArgs, Dispatcher, CONTENT_TYPE};
pub use endpoint::Endpoint;
pub use error::DispatchError;
pub use fetch::FetchTransport;
pub use response::{resolve_shape, DispatchResult};
pub use transport::{
    abort_pair, AbortHandle, AbortSignal, ApiRequest, ApiResponse, Credentials, Headers,
    RequestBody, ResponseBody, Transport, TransportError,
};
