//! Resolved scalar options.

use serde::{Deserialize, Serialize};

use super::Field;
use crate::slice::SelectionMode;

/// When column resizing commits widths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnResizeMode {
    /// Widths update while dragging.
    #[default]
    OnChange,
    /// Widths update when the drag ends.
    OnEnd,
}

/// Row density.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Density {
    Compact,
    #[default]
    Comfortable,
    Spacious,
}

/// Where the row model is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataMode {
    /// Rows are filtered, sorted and paged locally by the engine.
    #[default]
    Client,
    /// Rows come pre-processed from a data source.
    Server,
}

/// Scalar options from the grouped options object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DisplayGroup {
    pub page_size: Field<usize>,
    pub page_size_options: Field<Vec<usize>>,
    pub column_resize_mode: Field<ColumnResizeMode>,
    pub density: Field<Density>,
    pub row_selection_mode: Field<SelectionMode>,
    pub max_multi_sort_col_count: Field<usize>,
    pub data_mode: Field<DataMode>,
}

/// Legacy flat scalar props.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyDisplay {
    pub page_size: Option<usize>,
    pub page_size_options: Option<Vec<usize>>,
    pub column_resize_mode: Option<ColumnResizeMode>,
    pub density: Option<Density>,
    pub row_selection_mode: Option<SelectionMode>,
    pub max_multi_sort_col_count: Option<usize>,
    pub data_mode: Option<DataMode>,
}
