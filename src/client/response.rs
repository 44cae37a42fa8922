//! Dispatch results and response shape resolution.
//!
//! The declared `responses` of a route are advisory: nothing here parses
//! or checks a body unless the caller asks for it.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::client::error::DispatchError;
use crate::client::transport::ResponseBody;
use crate::contract::Route;
use crate::schema::Shape;

/// Declared shape for `status`, or the untyped shape when none is declared.
pub fn resolve_shape(route: &Route, status: u16) -> Shape {
    route.response(status).cloned().unwrap_or_else(Shape::any)
}

/// Outcome of one dispatch: the transport's status and body, verbatim.
#[derive(Debug, Clone)]
pub struct DispatchResult {
    pub status: u16,
    pub body: ResponseBody,
    key: String,
    route: Arc<Route>,
}

impl DispatchResult {
    pub(crate) fn new(status: u16, body: ResponseBody, key: String, route: Arc<Route>) -> Self {
        Self {
            status,
            body,
            key,
            route,
        }
    }

    /// Route this call resolved to.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Dotted key path of the route in the contract.
    pub fn route_key(&self) -> &str {
        &self.key
    }

    pub fn declared_shape(&self) -> Shape {
        resolve_shape(&self.route, self.status)
    }

    /// Whether the contract declares a shape for this status.
    pub fn is_declared(&self) -> bool {
        self.route.response(self.status).is_some()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserialize the body, whatever the status.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, DispatchError> {
        serde_json::from_value(self.body.to_value()).map_err(DispatchError::Decode)
    }

    /// Deserialize the body only when the status is `status`.
    ///
    /// ```ignore
    /// if let Some(post) = result.narrow::<Post>(200)? { /* ... */ }
    /// ```
    pub fn narrow<T: DeserializeOwned>(&self, status: u16) -> Result<Option<T>, DispatchError> {
        if self.status != status {
            return Ok(None);
        }
        self.json().map(Some)
    }

    pub fn text(&self) -> Option<&str> {
        self.body.as_text()
    }

    pub fn into_parts(self) -> (u16, ResponseBody) {
        (self.status, self.body)
    }
}
