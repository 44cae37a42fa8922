//! Route lookup.
//!
//! # Responsibilities
//! - Flatten a contract tree into per-method route lists
//! - Look up the route whose template matches a concrete path
//! - Return the matched route or an explicit not-found error
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Method filter first, then O(n) template scan within the method
//! - First structural match in declaration order; the contract tree
//!   guarantees at most one exists
//! - Explicit NotFound rather than silent default

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::contract::{ContractTree, Method, Route};
use crate::routing::matcher::PathParams;

/// Errors raised while resolving a concrete path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// No declared route matches the method and path.
    #[error("No route for {method} {path}{}", AllowedHint(.allowed))]
    NotFound {
        method: Method,
        path: String,
        /// Methods that do have a route for this path.
        allowed: Vec<Method>,
    },

    /// Rendering a template without a value for one of its params.
    #[error("Missing value for ':{param}' in '{template}'")]
    MissingParam { template: String, param: String },
}

struct AllowedHint<'a>(&'a Vec<Method>);

impl fmt::Display for AllowedHint<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        let names: Vec<&str> = self.0.iter().map(|m| m.as_str()).collect();
        write!(f, " (declared for {})", names.join(", "))
    }
}

/// A successful lookup.
#[derive(Debug, Clone)]
pub struct PathMatch<'a> {
    /// Dotted key path of the route in the contract tree.
    pub key: &'a str,
    pub route: &'a Arc<Route>,
    pub params: PathParams,
}

/// Resolves `(method, path)` pairs against a contract tree.
#[derive(Debug, Clone, Default)]
pub struct PathMatcher {
    by_method: HashMap<Method, Vec<(String, Arc<Route>)>>,
}

impl PathMatcher {
    pub fn new(tree: &ContractTree) -> Self {
        let mut by_method: HashMap<Method, Vec<(String, Arc<Route>)>> = HashMap::new();
        for (key, route) in tree.routes() {
            by_method.entry(route.method()).or_default().push((key, route));
        }
        Self { by_method }
    }

    /// Find the route declared for `method` whose template matches `path`.
    pub fn find(&self, method: Method, path: &str) -> Result<PathMatch<'_>, RouteError> {
        let candidates = self.by_method.get(&method).map(Vec::as_slice).unwrap_or_default();
        for (key, route) in candidates {
            if let Some(params) = route.path().matches(path) {
                tracing::trace!(%method, path, route = %key, "Route matched");
                return Ok(PathMatch {
                    key: key.as_str(),
                    route,
                    params,
                });
            }
        }

        Err(RouteError::NotFound {
            method,
            path: path.to_string(),
            allowed: self.allowed_methods(path),
        })
    }

    /// Methods that have some route matching `path`.
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        Method::ALL
            .into_iter()
            .filter(|m| {
                self.by_method
                    .get(m)
                    .is_some_and(|routes| routes.iter().any(|(_, r)| r.path().matches(path).is_some()))
            })
            .collect()
    }

    /// Number of routes known to the matcher.
    pub fn len(&self) -> usize {
        self.by_method.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::ContractTree;

    fn matcher() -> PathMatcher {
        let comments = ContractTree::builder()
            .route("getComments", Route::query("/posts/:id/comments").unwrap())
            .build()
            .unwrap();
        let tree = ContractTree::builder()
            .route("getPosts", Route::query("/posts").unwrap())
            .route("getPost", Route::query("/posts/:id").unwrap())
            .route("createAuthor", Route::mutation(Method::Post, "/authors/").unwrap())
            .nest("comments", comments)
            .build()
            .unwrap();
        PathMatcher::new(&tree)
    }

    #[test]
    fn test_nested_dynamic_match() {
        let m = matcher();
        let found = m.find(Method::Get, "/posts/123/comments").unwrap();
        assert_eq!(found.key, "comments.getComments");
        assert_eq!(found.params.get("id"), Some("123"));
    }

    #[test]
    fn test_segment_count_mismatch_picks_other_route() {
        let m = matcher();
        let found = m.find(Method::Get, "/posts/123").unwrap();
        assert_eq!(found.key, "getPost");
    }

    #[test]
    fn test_method_must_match() {
        let m = matcher();
        let err = m.find(Method::Post, "/posts/123/comments").unwrap_err();
        assert_eq!(
            err,
            RouteError::NotFound {
                method: Method::Post,
                path: "/posts/123/comments".into(),
                allowed: vec![Method::Get],
            }
        );
        assert_eq!(
            err.to_string(),
            "No route for POST /posts/123/comments (declared for GET)"
        );
    }

    #[test]
    fn test_no_default_fallback() {
        let m = matcher();
        let err = m.find(Method::Get, "/unknown").unwrap_err();
        assert_eq!(err.to_string(), "No route for GET /unknown");
    }

    #[test]
    fn test_query_string_does_not_affect_lookup() {
        let m = matcher();
        let found = m.find(Method::Get, "/posts?take=10").unwrap();
        assert_eq!(found.key, "getPosts");
    }

    #[test]
    fn test_trailing_slash_route() {
        let m = matcher();
        assert!(m.find(Method::Post, "/authors/").is_ok());
        assert!(m.find(Method::Post, "/authors").is_err());
        assert_eq!(m.len(), 4);
    }
}
