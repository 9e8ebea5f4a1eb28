//! Value types held by each slice.
//!
//! These are plain data. The helpers on them compute a next value from a
//! previous one so the engine can wrap them in updaters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

// =============================================================================
// Pagination
// =============================================================================

/// Current page and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    /// Current page (0-indexed).
    pub page_index: usize,
    /// Number of rows per page.
    pub page_size: usize,
}

impl PaginationState {
    /// First page with the given page size.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size,
        }
    }

    /// Total number of pages for a row count.
    pub fn page_count(&self, row_count: usize) -> usize {
        if self.page_size == 0 {
            0
        } else {
            row_count.div_ceil(self.page_size)
        }
    }

    /// Row range shown on the current page (exclusive end).
    pub fn row_range(&self, row_count: usize) -> std::ops::Range<usize> {
        let start = self.page_index.saturating_mul(self.page_size).min(row_count);
        let end = start.saturating_add(self.page_size).min(row_count);
        start..end
    }

    /// The next page, or `self` when already on the last page.
    pub fn next_page(&self, row_count: usize) -> Self {
        let next = self.page_index.saturating_add(1);
        if next < self.page_count(row_count) {
            Self {
                page_index: next,
                ..*self
            }
        } else {
            *self
        }
    }

    /// The previous page, or `self` when already on the first page.
    pub fn previous_page(&self) -> Self {
        Self {
            page_index: self.page_index.saturating_sub(1),
            ..*self
        }
    }

    /// Change the page size and go back to the first page.
    pub fn with_page_size(&self, page_size: usize) -> Self {
        Self::new(page_size)
    }

    /// Move back onto the last page if the row count shrank below the
    /// current page.
    pub fn clamped(&self, row_count: usize) -> Self {
        let pages = self.page_count(row_count);
        if pages > 0 && self.page_index >= pages {
            Self {
                page_index: pages - 1,
                ..*self
            }
        } else {
            *self
        }
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

// =============================================================================
// Sorting
// =============================================================================

/// Sort applied to one column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnSort {
    /// Column ID.
    pub id: String,
    /// Descending when `true`.
    pub desc: bool,
}

impl ColumnSort {
    /// Ascending sort on a column.
    pub fn asc(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            desc: false,
        }
    }

    /// Descending sort on a column.
    pub fn desc(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            desc: true,
        }
    }
}

/// Ordered list of column sorts, highest priority first.
pub type SortingState = Vec<ColumnSort>;

/// Options controlling a header-click sort toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortToggle {
    /// Keep other sorted columns (multi-sort click).
    pub multi: bool,
    /// A descending column cycles back to unsorted instead of ascending.
    pub removal: bool,
    /// Upper bound on simultaneously sorted columns.
    pub max_columns: Option<usize>,
}

impl Default for SortToggle {
    fn default() -> Self {
        Self {
            multi: false,
            removal: true,
            max_columns: None,
        }
    }
}

/// Cycle a column through ascending, descending and (optionally) unsorted.
pub fn toggle_sort(sorting: &[ColumnSort], id: &str, opts: SortToggle) -> SortingState {
    let existing = sorting.iter().find(|s| s.id == id);
    let next = match existing {
        None => Some(ColumnSort::asc(id)),
        Some(s) if !s.desc => Some(ColumnSort::desc(id)),
        Some(_) if opts.removal => None,
        Some(_) => Some(ColumnSort::asc(id)),
    };

    if !opts.multi {
        return next.into_iter().collect();
    }

    let mut result: SortingState = Vec::with_capacity(sorting.len() + 1);
    let mut placed = false;
    for s in sorting {
        if s.id == id {
            if let Some(n) = next.clone() {
                result.push(n);
            }
            placed = true;
        } else {
            result.push(s.clone());
        }
    }
    if !placed && let Some(n) = next {
        result.push(n);
    }
    if let Some(max) = opts.max_columns
        && result.len() > max
    {
        let excess = result.len() - max;
        result.drain(..excess);
    }
    result
}

// =============================================================================
// Filters
// =============================================================================

/// Filter value applied to one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilter {
    /// Column ID.
    pub id: String,
    /// Filter value, interpreted by the engine.
    pub value: serde_json::Value,
}

/// Active column filters.
pub type ColumnFiltersState = Vec<ColumnFilter>;

/// Set, replace or (with `None`) remove the filter for a column.
pub fn set_column_filter(
    filters: &[ColumnFilter],
    id: &str,
    value: Option<serde_json::Value>,
) -> ColumnFiltersState {
    let mut next: ColumnFiltersState = filters.iter().filter(|f| f.id != id).cloned().collect();
    if let Some(value) = value {
        let filter = ColumnFilter {
            id: id.to_string(),
            value,
        };
        match filters.iter().position(|f| f.id == id) {
            Some(pos) => next.insert(pos.min(next.len()), filter),
            None => next.push(filter),
        }
    }
    next
}

/// Free-text filter applied across all columns.
pub type GlobalFilterState = String;

// =============================================================================
// Columns
// =============================================================================

/// Column ID to visibility. Columns not listed are visible.
pub type VisibilityState = BTreeMap<String, bool>;

/// Check whether a column is visible.
pub fn is_column_visible(visibility: &VisibilityState, id: &str) -> bool {
    visibility.get(id).copied().unwrap_or(true)
}

/// Flip a column's visibility.
pub fn toggle_visibility(visibility: &VisibilityState, id: &str) -> VisibilityState {
    let mut next = visibility.clone();
    next.insert(id.to_string(), !is_column_visible(visibility, id));
    next
}

/// Explicit column order. Columns not listed keep their declared order after
/// the listed ones.
pub type ColumnOrderState = Vec<String>;

/// Side a column is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PinSide {
    Left,
    Right,
}

/// Columns pinned to either edge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPinningState {
    pub left: Vec<String>,
    pub right: Vec<String>,
}

impl ColumnPinningState {
    /// Pin a column to a side, or unpin it with `None`.
    pub fn pinned(&self, id: &str, side: Option<PinSide>) -> Self {
        let mut next = Self {
            left: self.left.iter().filter(|c| *c != id).cloned().collect(),
            right: self.right.iter().filter(|c| *c != id).cloned().collect(),
        };
        match side {
            Some(PinSide::Left) => next.left.push(id.to_string()),
            Some(PinSide::Right) => next.right.push(id.to_string()),
            None => {}
        }
        next
    }

    /// Side a column is pinned to, if any.
    pub fn side_of(&self, id: &str) -> Option<PinSide> {
        if self.left.iter().any(|c| c == id) {
            Some(PinSide::Left)
        } else if self.right.iter().any(|c| c == id) {
            Some(PinSide::Right)
        } else {
            None
        }
    }
}

/// Column ID to width.
pub type ColumnSizingState = BTreeMap<String, f64>;

// =============================================================================
// Rows
// =============================================================================

/// Column IDs rows are grouped by, outermost first.
pub type GroupingState = Vec<String>;

/// Add a column to the grouping, or remove it if already grouped.
pub fn toggle_grouping(grouping: &[String], id: &str) -> GroupingState {
    if grouping.iter().any(|g| g == id) {
        grouping.iter().filter(|g| *g != id).cloned().collect()
    } else {
        let mut next = grouping.to_vec();
        next.push(id.to_string());
        next
    }
}

/// Expanded rows.
///
/// Serialized either as `true` (every row expanded) or as a map of row ID to
/// expanded flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpandedState {
    All(bool),
    Rows(BTreeMap<String, bool>),
}

impl ExpandedState {
    /// Check whether a row is expanded.
    pub fn is_expanded(&self, id: &str) -> bool {
        match self {
            Self::All(all) => *all,
            Self::Rows(rows) => rows.get(id).copied().unwrap_or(false),
        }
    }

    /// Flip one row.
    ///
    /// Leaving the "all expanded" state needs the full row list so the other
    /// rows stay expanded.
    pub fn toggled<'a>(&self, id: &str, all_rows: impl IntoIterator<Item = &'a str>) -> Self {
        let mut rows = match self {
            Self::All(true) => all_rows.into_iter().map(|r| (r.to_string(), true)).collect(),
            Self::All(false) => BTreeMap::new(),
            Self::Rows(rows) => rows.clone(),
        };
        let expanded = self.is_expanded(id);
        if expanded {
            rows.remove(id);
        } else {
            rows.insert(id.to_string(), true);
        }
        Self::Rows(rows)
    }
}

impl Default for ExpandedState {
    fn default() -> Self {
        Self::Rows(BTreeMap::new())
    }
}
