//! Path template parsing and matching.
//!
//! # Responsibilities
//! - Parse `/posts/:id/comments` style templates into segments
//! - Match a concrete path segment-by-segment against a template
//! - Extract dynamic segment values as path params
//! - Render a template back into a concrete path
//!
//! # Design Decisions
//! - Literal segments match exactly (case-sensitive)
//! - Dynamic segments match exactly one non-empty segment
//! - Segment counts must be equal; there is no multi-segment wildcard
//! - No regex, so matching stays O(segments)

use std::fmt;

use crate::contract::ContractError;
use crate::routing::router::RouteError;

/// Marker that turns a template segment into a dynamic one.
pub const PARAM_MARKER: char = ':';

/// One segment of a path template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Literal(String),
    Param(String),
}

/// Values extracted from dynamic segments, in template order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    entries: Vec<(String, String)>,
}

impl PathParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a param.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A parsed path template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parse a template. It must start with `/`.
    pub fn parse(raw: &str) -> Result<Self, ContractError> {
        let invalid = |reason: &str| ContractError::InvalidPath {
            path: raw.to_string(),
            reason: reason.to_string(),
        };

        let rest = raw
            .strip_prefix('/')
            .ok_or_else(|| invalid("must start with '/'"))?;
        if rest.contains('?') {
            return Err(invalid("must not contain a query string"));
        }

        let mut segments = Vec::new();
        for part in rest.split('/') {
            match part.strip_prefix(PARAM_MARKER) {
                Some("") => return Err(invalid("dynamic segment has no name")),
                Some(name) => {
                    let seen = segments
                        .iter()
                        .any(|s| matches!(s, Segment::Param(n) if n == name));
                    if seen {
                        return Err(invalid(&format!("dynamic segment '{}' repeated", name)));
                    }
                    segments.push(Segment::Param(name.to_string()));
                }
                None => segments.push(Segment::Literal(part.to_string())),
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names of the dynamic segments, in order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Template with param names erased; two templates with the same key
    /// match exactly the same set of paths.
    pub fn structural_key(&self) -> String {
        let mut key = String::new();
        for segment in &self.segments {
            key.push('/');
            match segment {
                Segment::Literal(lit) => key.push_str(lit),
                Segment::Param(_) => key.push(PARAM_MARKER),
            }
        }
        key
    }

    /// Match a concrete path. Anything after `?` is ignored.
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let path = path.split('?').next().unwrap_or_default();
        let rest = path.strip_prefix('/')?;

        let mut params = PathParams::new();
        let mut concrete = rest.split('/');
        for segment in &self.segments {
            let value = concrete.next()?;
            match segment {
                Segment::Literal(lit) => {
                    if lit != value {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if value.is_empty() {
                        return None;
                    }
                    let decoded = urlencoding::decode(value)
                        .map(|v| v.into_owned())
                        .unwrap_or_else(|_| value.to_string());
                    params.insert(name.clone(), decoded);
                }
            }
        }

        if concrete.next().is_some() {
            return None;
        }
        Some(params)
    }

    /// Substitute params into the template, percent-encoding each value.
    pub fn render(&self, params: &PathParams) -> Result<String, RouteError> {
        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Literal(lit) => path.push_str(lit),
                Segment::Param(name) => {
                    let value = params
                        .get(name)
                        .filter(|v| !v.is_empty())
                        .ok_or_else(|| RouteError::MissingParam {
                            template: self.raw.clone(),
                            param: name.clone(),
                        })?;
                    path.push_str(&urlencoding::encode(value));
                }
            }
        }
        Ok(path)
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
