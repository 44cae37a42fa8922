//! Contract tree: the immutable registry of routes.

use std::collections::HashMap;
use std::sync::Arc;

use crate::contract::route::Route;
use crate::contract::types::{ContractError, ContractResult, Method};

/// An entry of a contract tree.
#[derive(Debug, Clone)]
pub enum ContractNode {
    Route(Arc<Route>),
    Tree(ContractTree),
}

/// Nested, ordered mapping from keys to routes or sub-trees.
///
/// Built once through [`ContractTree::builder`]; read-only afterwards and
/// safe to share across tasks behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct ContractTree {
    entries: Vec<(String, ContractNode)>,
}

impl ContractTree {
    pub fn builder() -> ContractBuilder {
        ContractBuilder::default()
    }

    pub fn get(&self, key: &str) -> Option<&ContractNode> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, n)| n)
    }

    /// Look up a route by its key path, e.g. `["comments", "getComments"]`.
    pub fn route_at(&self, keys: &[&str]) -> Option<&Arc<Route>> {
        let (last, parents) = keys.split_last()?;
        let mut tree = self;
        for key in parents {
            match tree.get(key)? {
                ContractNode::Tree(sub) => tree = sub,
                ContractNode::Route(_) => return None,
            }
        }
        match tree.get(last)? {
            ContractNode::Route(route) => Some(route),
            ContractNode::Tree(_) => None,
        }
    }

    /// Top-level entries in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ContractNode)> {
        self.entries.iter().map(|(k, n)| (k.as_str(), n))
    }

    /// Every route, depth-first in declaration order, with its dotted key path.
    pub fn routes(&self) -> Vec<(String, Arc<Route>)> {
        let mut out = Vec::new();
        self.collect_routes("", &mut out);
        out
    }

    fn collect_routes(&self, prefix: &str, out: &mut Vec<(String, Arc<Route>)>) {
        for (key, node) in &self.entries {
            let key_path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };
            match node {
                ContractNode::Route(route) => out.push((key_path, route.clone())),
                ContractNode::Tree(sub) => sub.collect_routes(&key_path, out),
            }
        }
    }

    /// Number of routes in the whole tree.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .map(|(_, node)| match node {
                ContractNode::Route(_) => 1,
                ContractNode::Tree(sub) => sub.len(),
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Collects routes and sub-trees, then validates the result.
#[derive(Debug, Default)]
pub struct ContractBuilder {
    entries: Vec<(String, ContractNode)>,
}

impl ContractBuilder {
    pub fn route(mut self, key: impl Into<String>, route: Route) -> Self {
        self.entries
            .push((key.into(), ContractNode::Route(Arc::new(route))));
        self
    }

    pub fn nest(mut self, key: impl Into<String>, tree: ContractTree) -> Self {
        self.entries.push((key.into(), ContractNode::Tree(tree)));
        self
    }

    /// Validate and freeze the tree.
    ///
    /// Rejects dotted or duplicate keys per level, bodies on GET routes,
    /// and any two routes sharing a method and structural path template.
    pub fn build(self) -> ContractResult<ContractTree> {
        let mut keys = std::collections::HashSet::new();
        for (key, _) in &self.entries {
            if key.contains('.') {
                return Err(ContractError::InvalidKey(key.clone()));
            }
            if !keys.insert(key.as_str()) {
                return Err(ContractError::DuplicateKey(key.clone()));
            }
        }

        let tree = ContractTree {
            entries: self.entries,
        };

        let mut seen: HashMap<(Method, String), String> = HashMap::new();
        for (key_path, route) in tree.routes() {
            if route.method() == Method::Get && route.body_shape().is_some() {
                return Err(ContractError::BodyOnQueryRoute { key: key_path });
            }
            let slot = (route.method(), route.path().structural_key());
            if let Some(first) = seen.get(&slot) {
                return Err(ContractError::DuplicateRoute {
                    method: route.method(),
                    path: route.path().to_string(),
                    first: first.clone(),
                    second: key_path,
                });
            }
            seen.insert(slot, key_path);
        }

        Ok(tree)
    }
}
