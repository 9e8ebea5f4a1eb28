//! Controlled / uncontrolled state reconciliation for data grids.
//!
//! A caller configures a grid through grouped options, legacy flat props and
//! built-in defaults. [`Grid`] resolves these into a canonical record and,
//! per state slice, decides whether the caller or the grid owns the value.
//! The resulting [`GridBindings`] carry a `(value, dispatch)` pair for every
//! slice; dispatching either notifies the caller or writes the grid's store.

pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod grid;
pub mod ownership;
pub mod slice;
pub mod store;
pub mod updater;

pub use config::{CanonicalConfig, Defaults, Feature, GridOptions, resolve};
pub use grid::{Binding, Grid, GridBindings};
pub use updater::{OnChange, Updater};

pub mod prelude {
    pub use crate::config::{
        CanonicalConfig, ColumnResizeMode, DataMode, Defaults, Density, Feature, Field,
        GridOptions,
    };
    pub use crate::dispatch::Dispatch;
    pub use crate::engine::{ColumnDescriptor, Exporter, GridEngine, export_columns};
    pub use crate::error::{ConfigError, DispatchError, FetchError, UpdaterError};
    pub use crate::fetch::{DataSource, FetchPage, FetchQuery, LoadOutcome, ServerData};
    pub use crate::grid::{Binding, Grid, GridBindings};
    pub use crate::ownership::{Ownership, classify, is_controlled};
    pub use crate::slice::*;
    pub use crate::updater::{OnChange, Updater};
}
