//! Contract declaration subsystem.
//!
//! # Data Flow
//! ```text
//! Route::query / Route::mutation (in code)      api.toml (contract file)
//!     → ContractBuilder.route / .nest               → file.rs (parse tables)
//!     → build(): duplicate + body checks            → ContractBuilder
//!     → ContractTree (immutable, shared via Arc)
//!     → routing::PathMatcher (flattened lookup)
//! ```
//!
//! # Design Decisions
//! - Query routes (GET) and mutation routes are distinct constructors
//! - A tree is validated once at build time; lookups never re-check
//! - Keys keep declaration order so "first structural match" is stable
//! - No two routes may share a method and structural path template

pub mod file;
pub mod route;
pub mod tree;
pub mod types;

pub use file::{load_contract, parse_contract};
pub use route::Route;
pub use tree::{ContractBuilder, ContractNode, ContractTree};
pub use types::{ContractError, ContractResult, Method};

pub use crate::schema::Shape;
