//! Typed endpoints.
//!
//! An [`Endpoint`] ties a Rust type to one contract route so call sites
//! get compile-time checked query and body types.
//!
//! ```ignore
//! struct GetComments { id: u64, page: Page }
//!
//! impl Endpoint for GetComments {
//!     const METHOD: Method = Method::Get;
//!     type Query = Page;
//!     type Body = ();
//!
//!     fn path(&self) -> String {
//!         format!("/posts/{}/comments", self.id)
//!     }
//!
//!     fn query(&self) -> Option<&Page> {
//!         Some(&self.page)
//!     }
//! }
//!
//! let result = dispatcher.call(&GetComments { id: 1, page }).await?;
//! ```

use serde::Serialize;

use crate::client::transport::AbortSignal;
use crate::contract::Method;

pub trait Endpoint {
    const METHOD: Method;

    type Query: Serialize;
    type Body: Serialize;

    /// Concrete path with every dynamic segment substituted.
    fn path(&self) -> String;

    fn query(&self) -> Option<&Self::Query> {
        None
    }

    fn body(&self) -> Option<&Self::Body> {
        None
    }

    /// Cancellation signal handed to the transport untouched.
    fn signal(&self) -> Option<AbortSignal> {
        None
    }
}
