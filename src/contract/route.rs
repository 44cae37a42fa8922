//! Route definitions.

use std::collections::BTreeMap;

use crate::contract::types::{ContractError, ContractResult, Method};
use crate::routing::PathTemplate;
use crate::schema::Shape;

/// One declared endpoint.
///
/// Constructed through [`Route::query`] (GET) or [`Route::mutation`]
/// (POST/PUT/PATCH/DELETE), then refined with the builder methods.
/// Immutable once it is placed in a [`ContractTree`](crate::contract::ContractTree).
#[derive(Debug, Clone)]
pub struct Route {
    method: Method,
    path: PathTemplate,
    query: Option<Shape>,
    body: Option<Shape>,
    summary: Option<String>,
    description: Option<String>,
    responses: BTreeMap<u16, Shape>,
}

impl Route {
    /// A GET route.
    pub fn query(path: &str) -> ContractResult<Self> {
        Self::new(Method::Get, path)
    }

    /// A route for a method that may carry a body.
    pub fn mutation(method: Method, path: &str) -> ContractResult<Self> {
        if !method.is_mutation() {
            return Err(ContractError::NotAMutation(method));
        }
        Self::new(method, path)
    }

    fn new(method: Method, path: &str) -> ContractResult<Self> {
        Ok(Self {
            method,
            path: PathTemplate::parse(path)?,
            query: None,
            body: None,
            summary: None,
            description: None,
            responses: BTreeMap::new(),
        })
    }

    pub fn with_query(mut self, shape: impl Into<Shape>) -> Self {
        self.query = Some(shape.into());
        self
    }

    /// Body shape. Rejected when the tree is built if this is a GET route.
    pub fn with_body(mut self, shape: impl Into<Shape>) -> Self {
        self.body = Some(shape.into());
        self
    }

    /// Declare the expected body shape for a status code.
    pub fn respond(mut self, status: u16, shape: impl Into<Shape>) -> Self {
        self.responses.insert(status, shape.into());
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &PathTemplate {
        &self.path
    }

    pub fn query_shape(&self) -> Option<&Shape> {
        self.query.as_ref()
    }

    pub fn body_shape(&self) -> Option<&Shape> {
        self.body.as_ref()
    }

    pub fn summary_text(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn responses(&self) -> &BTreeMap<u16, Shape> {
        &self.responses
    }

    /// Declared shape for `status`, if any.
    pub fn response(&self, status: u16) -> Option<&Shape> {
        self.responses.get(&status)
    }
}
