//! Server-driven data.
//!
//! In server mode the row model comes from a caller-supplied [`DataSource`].
//! [`ServerData`] runs fetches against the current slice values and guards
//! against out-of-order completion with a generation counter.

mod resource;
mod source;

pub use resource::*;
pub use source::*;
