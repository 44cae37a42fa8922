//! Declarative contract files.
//!
//! A contract file is a TOML document. Tables carrying `method` and `path`
//! are routes; every other table is a nested tree.
//!
//! ```toml
//! [getPosts]
//! method = "GET"
//! path = "/posts"
//! query = "object"
//! responses = { 200 = "object" }
//!
//! [comments.createComment]
//! method = "POST"
//! path = "/posts/:id/comments"
//! body = "object"
//! responses = { 201 = "object", 404 = "null" }
//! ```

use std::fs;
use std::path::Path;

use crate::contract::route::Route;
use crate::contract::tree::{ContractBuilder, ContractTree};
use crate::contract::types::{ContractError, ContractResult, Method};
use crate::schema::{JsonKind, Shape};

/// Read and build a contract tree from a TOML file.
pub fn load_contract(path: &Path) -> ContractResult<ContractTree> {
    let content = fs::read_to_string(path)
        .map_err(|e| ContractError::File(format!("{}: {}", path.display(), e)))?;
    parse_contract(&content)
}

/// Build a contract tree from TOML text.
pub fn parse_contract(content: &str) -> ContractResult<ContractTree> {
    let table: toml::Table = content
        .parse()
        .map_err(|e: toml::de::Error| ContractError::File(e.to_string()))?;
    parse_tree(&table, "")
}

fn parse_tree(table: &toml::Table, prefix: &str) -> ContractResult<ContractTree> {
    let mut builder = ContractBuilder::default();
    for (key, value) in table {
        let key_path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        let entry = value
            .as_table()
            .ok_or_else(|| file_error(&key_path, "expected a table"))?;

        builder = if entry.contains_key("method") {
            builder.route(key.clone(), parse_route(entry, &key_path)?)
        } else {
            builder.nest(key.clone(), parse_tree(entry, &key_path)?)
        };
    }
    builder.build()
}

fn parse_route(entry: &toml::Table, key_path: &str) -> ContractResult<Route> {
    let method: Method = string_field(entry, "method", key_path)?
        .ok_or_else(|| file_error(key_path, "missing 'method'"))?
        .parse()?;
    let path = string_field(entry, "path", key_path)?
        .ok_or_else(|| file_error(key_path, "missing 'path'"))?;

    let mut route = if method.is_mutation() {
        Route::mutation(method, path)?
    } else {
        Route::query(path)?
    };

    if let Some(kind) = string_field(entry, "query", key_path)? {
        route = route.with_query(parse_shape(kind, key_path)?);
    }
    if let Some(kind) = string_field(entry, "body", key_path)? {
        route = route.with_body(parse_shape(kind, key_path)?);
    }
    if let Some(summary) = string_field(entry, "summary", key_path)? {
        route = route.summary(summary);
    }
    if let Some(description) = string_field(entry, "description", key_path)? {
        route = route.description(description);
    }

    if let Some(responses) = entry.get("responses") {
        let responses = responses
            .as_table()
            .ok_or_else(|| file_error(key_path, "'responses' must be a table"))?;
        for (status, kind) in responses {
            let status: u16 = status
                .parse()
                .map_err(|_| file_error(key_path, &format!("invalid status code '{}'", status)))?;
            let kind = kind
                .as_str()
                .ok_or_else(|| file_error(key_path, "response shapes must be strings"))?;
            route = route.respond(status, parse_shape(kind, key_path)?);
        }
    }

    Ok(route)
}

fn string_field<'a>(
    entry: &'a toml::Table,
    field: &str,
    key_path: &str,
) -> ContractResult<Option<&'a str>> {
    match entry.get(field) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or_else(|| file_error(key_path, &format!("'{}' must be a string", field))),
    }
}

fn parse_shape(kind: &str, key_path: &str) -> ContractResult<Shape> {
    kind.parse::<JsonKind>()
        .map(Shape::from)
        .map_err(|e| file_error(key_path, &e))
}

fn file_error(key_path: &str, reason: &str) -> ContractError {
    ContractError::File(format!("{}: {}", key_path, reason))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOG: &str = r#"
        [getPosts]
        method = "GET"
        path = "/posts"
        query = "object"
        summary = "List posts"
        responses = { 200 = "object" }

        [comments.getComments]
        method = "GET"
        path = "/posts/:id/comments"
        responses = { 200 = "object" }

        [comments.createComment]
        method = "POST"
        path = "/posts/:id/comments"
        body = "object"
        responses = { 201 = "object", 404 = "null" }
    "#;

    #[test]
    fn test_parse_nested_contract() {
        let tree = parse_contract(BLOG).unwrap();
        assert_eq!(tree.len(), 3);

        let create = tree.route_at(&["comments", "createComment"]).unwrap();
        assert_eq!(create.method(), Method::Post);
        assert_eq!(create.body_shape().map(|s| s.name()), Some("object"));
        assert_eq!(create.response(404).map(|s| s.name()), Some("null"));

        let list = tree.route_at(&["getPosts"]).unwrap();
        assert_eq!(list.summary_text(), Some("List posts"));
    }

    #[test]
    fn test_declaration_order_preserved() {
        let tree = parse_contract(BLOG).unwrap();
        let keys: Vec<String> = tree.routes().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec!["getPosts", "comments.getComments", "comments.createComment"]
        );
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let err = parse_contract(
            r#"
            [x]
            method = "GET"
            path = "/x"
            responses = { 200 = "widget" }
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown shape kind 'widget'"));
    }

    #[test]
    fn test_lowercase_method_rejected() {
        let err = parse_contract(
            r#"
            [x]
            method = "get"
            path = "/x"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::UnknownMethod(m) if m == "get"));
    }

    #[test]
    fn test_quoted_dotted_key_rejected() {
        let err = parse_contract(
            r#"
            ["a.b"]
            method = "GET"
            path = "/x"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::InvalidKey(k) if k == "a.b"));
    }

    #[test]
    fn test_duplicate_route_in_file_rejected() {
        let err = parse_contract(
            r#"
            [a]
            method = "GET"
            path = "/posts/:id"

            [b]
            method = "GET"
            path = "/posts/:slug"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::DuplicateRoute { .. }));
    }
}
