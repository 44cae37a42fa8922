//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatch call (method, concrete path)
//!     → router.rs (method filter, ordered template scan)
//!     → matcher.rs (segment-by-segment template match)
//!     → Return: PathMatch (route + params) or RouteError::NotFound
//!
//! Matcher construction (once per client):
//!     ContractTree
//!     → Flatten nested trees in declaration order
//!     → Group by method
//!     → Freeze as immutable PathMatcher
//! ```
//!
//! # Design Decisions
//! - Routes flattened at construction, immutable at runtime
//! - No regex in the hot path
//! - Deterministic: same input always matches the same route

pub mod matcher;
pub mod router;

pub use matcher::{PathParams, PathTemplate, Segment, PARAM_MARKER};
pub use router::{PathMatch, PathMatcher, RouteError};
