//! Grid configuration: raw sources and the canonical record resolved from
//! them.

mod display;
mod features;
mod field;
mod resolver;
mod sources;

pub use display::*;
pub use features::*;
pub use field::{Field, layer};
pub use resolver::*;
pub use sources::*;
