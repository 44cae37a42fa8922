//! Contract-level types and error definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTTP methods a contract route may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// All methods, in declaration order.
    pub const ALL: [Method; 5] = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Patch,
        Method::Delete,
    ];

    /// Upper-case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    /// Mutation methods may carry a request body.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Method::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ContractError;

    /// Exact upper-case names only; `get` is not `GET`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ContractError::UnknownMethod(s.to_string()))
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Errors raised while declaring or loading a contract.
#[derive(Debug, Error)]
pub enum ContractError {
    /// Method name is not one of GET/POST/PUT/PATCH/DELETE.
    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    /// Path template is malformed.
    #[error("Invalid path template '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// Two routes declare the same method and path template.
    #[error("Duplicate route {method} {path}: declared by '{first}' and '{second}'")]
    DuplicateRoute {
        method: Method,
        path: String,
        first: String,
        second: String,
    },

    /// Two entries at the same level share a key.
    #[error("Duplicate contract key '{0}'")]
    DuplicateKey(String),

    /// Keys join into dotted key paths, so they cannot contain `.`.
    #[error("Contract key '{0}' must not contain '.'")]
    InvalidKey(String),

    /// `Route::mutation` was given GET.
    #[error("{0} routes are declared with Route::query, not Route::mutation")]
    NotAMutation(Method),

    /// A GET route declared a request body.
    #[error("Route '{key}' is a GET route and cannot declare a body")]
    BodyOnQueryRoute { key: String },

    /// Contract file could not be read or understood.
    #[error("Contract file error: {0}")]
    File(String),
}

/// Result type for contract operations.
pub type ContractResult<T> = Result<T, ContractError>;
