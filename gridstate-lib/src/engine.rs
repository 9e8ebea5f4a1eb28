//! Contracts for the external collaborators.
//!
//! The engine turns bindings into a row model and output, and answers user
//! interaction by calling dispatchers. An exporter reads the engine's current
//! rows together with the columns the user can see.

use serde::{Deserialize, Serialize};

use crate::config::CanonicalConfig;
use crate::grid::GridBindings;
use crate::slice::{ColumnOrderState, VisibilityState, is_column_visible};

/// The grid engine.
pub trait GridEngine {
    /// Take the bindings for a new pass.
    fn sync(&mut self, config: &CanonicalConfig, bindings: &GridBindings);
}

/// A column as declared by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column ID, as used by every column-keyed slice.
    pub id: String,
    /// Header text.
    pub header: String,
}

impl ColumnDescriptor {
    pub fn new(id: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
        }
    }
}

/// Error produced by an exporter.
#[derive(Debug, thiserror::Error)]
#[error("export failed: {0}")]
pub struct ExportError(pub String);

/// Formats the engine's current rows.
pub trait Exporter {
    /// Row type the exporter reads.
    type Row;

    /// Export rows restricted to the given columns, in order.
    fn export(&self, rows: &[Self::Row], columns: &[ColumnDescriptor]) -> Result<String, ExportError>;
}

/// Columns in display order with hidden ones removed.
///
/// Columns named in `order` come first, in that order; the rest keep their
/// declared order.
pub fn visible_columns(
    columns: &[ColumnDescriptor],
    order: &ColumnOrderState,
    visibility: &VisibilityState,
) -> Vec<ColumnDescriptor> {
    let mut ordered: Vec<&ColumnDescriptor> = order
        .iter()
        .filter_map(|id| columns.iter().find(|c| &c.id == id))
        .collect();
    ordered.extend(columns.iter().filter(|c| !order.contains(&c.id)));
    ordered
        .into_iter()
        .filter(|c| is_column_visible(visibility, &c.id))
        .cloned()
        .collect()
}

/// The columns an export should include for the current bindings.
pub fn export_columns(columns: &[ColumnDescriptor], bindings: &GridBindings) -> Vec<ColumnDescriptor> {
    visible_columns(
        columns,
        &bindings.column_order.value,
        &bindings.column_visibility.value,
    )
}
