//! Row selection state.
//!
//! Selection is keyed by row ID so it stays stable when rows are added,
//! removed or re-sorted by the engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Selection mode for rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionMode {
    /// No selection allowed
    None,
    /// Single row selection
    Single,
    /// Multiple rows can be selected
    #[default]
    Multiple,
}

/// ID-based row selection state.
///
/// Serialized as a map of row ID to `true`. Rows mapped to `false` are
/// treated as unselected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowSelectionState(BTreeMap<String, bool>);

impl RowSelectionState {
    /// Create a new empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all selected IDs (sorted for deterministic ordering).
    pub fn selected(&self) -> Vec<String> {
        self.0
            .iter()
            .filter(|(_, on)| **on)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Check if an ID is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.0.get(id).copied().unwrap_or(false)
    }

    /// Get the number of selected rows.
    pub fn len(&self) -> usize {
        self.0.values().filter(|on| **on).count()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Selection holding only `id`.
    ///
    /// Unchanged when selection is disabled.
    pub fn only(&self, id: &str, mode: SelectionMode) -> Self {
        if mode == SelectionMode::None {
            return self.clone();
        }
        std::iter::once(id).collect()
    }

    /// Selection with `id` flipped.
    ///
    /// In `Single` mode selecting a row deselects every other row.
    pub fn toggled(&self, id: &str, mode: SelectionMode) -> Self {
        match mode {
            SelectionMode::None => self.clone(),
            _ if self.is_selected(id) => {
                let mut next = self.clone();
                next.0.remove(id);
                next
            }
            SelectionMode::Single => self.only(id, mode),
            SelectionMode::Multiple => {
                let mut next = self.clone();
                next.0.insert(id.to_string(), true);
                next
            }
        }
    }

    /// Selection extended with every given ID (multiple mode only).
    pub fn with_all<'a>(
        &self,
        ids: impl IntoIterator<Item = &'a str>,
        mode: SelectionMode,
    ) -> Self {
        let mut next = self.clone();
        if mode == SelectionMode::Multiple {
            next.0.extend(ids.into_iter().map(|id| (id.to_string(), true)));
        }
        next
    }
}

impl<S: Into<String>> FromIterator<S> for RowSelectionState {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(|id| (id.into(), true)).collect())
    }
}
