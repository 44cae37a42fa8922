//! Contract-checked HTTP API client.
//!
//! A contract tree declares every route an API exposes. The dispatcher
//! refuses calls the contract does not declare, encodes query objects into
//! bracketed query strings and hands one request to a pluggable transport.

pub mod client;
pub mod config;
pub mod contract;
pub mod observability;
pub mod query;
pub mod routing;
pub mod schema;

pub use client::{CallArgs, DispatchError, DispatchResult, Dispatcher, Endpoint, Transport};
pub use config::ClientConfig;
pub use contract::{ContractTree, Method, Route};
pub use schema::{JsonKind, Shape};
