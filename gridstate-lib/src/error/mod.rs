//! Error types

mod config;
mod dispatch;
mod fetch;

pub use config::*;
pub use dispatch::*;
pub use fetch::*;
