//! The config resolver.
//!
//! Every field is resolved the same way: start from the built-in default,
//! let a present grouped field overwrite it, then let a set legacy prop
//! overwrite that. Fields are walked explicitly so a grouped key that is
//! present but undefined erases the default, exactly like a shallow merge
//! would.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{
    ColumnResizeMode, DataMode, Defaults, Density, Feature, Field, GridOptions, GroupedOptions,
    LegacyOptions, layer,
};
use crate::slice::{DEFAULT_PAGE_SIZE, SelectionMode, SortToggle};

/// The canonical configuration record.
///
/// Produced fresh from the raw sources on every pass and never mutated in
/// place. Feature flags are plain booleans; a flag whose grouped key was
/// explicitly undefined (and not rescued by a legacy prop) resolves to
/// `false` and is listed in [`undefined_fields`](Self::undefined_fields).
/// Scalars stay optional so the same case remains visible as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalConfig {
    pub features: BTreeMap<Feature, bool>,
    pub page_size: Option<usize>,
    pub page_size_options: Option<Vec<usize>>,
    pub column_resize_mode: Option<ColumnResizeMode>,
    pub density: Option<Density>,
    pub row_selection_mode: Option<SelectionMode>,
    pub max_multi_sort_col_count: Option<usize>,
    pub data_mode: Option<DataMode>,
    /// Fields erased by an explicitly undefined grouped key.
    pub undefined_fields: Vec<String>,
}

impl CanonicalConfig {
    /// Check whether a feature is enabled.
    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.features.get(&feature).copied().unwrap_or(false)
    }

    /// Page size, falling back to the built-in size when undefined.
    pub fn effective_page_size(&self) -> usize {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Rows come from a data source rather than the local row model.
    pub fn is_server_mode(&self) -> bool {
        self.data_mode == Some(DataMode::Server)
    }

    /// Effective row selection mode: `None` unless row selection is enabled.
    pub fn selection_mode(&self) -> SelectionMode {
        if self.is_enabled(Feature::RowSelection) {
            self.row_selection_mode.unwrap_or_default()
        } else {
            SelectionMode::None
        }
    }

    /// Sort toggle options for a header click.
    ///
    /// `multi_click` is the engine's multi-sort gesture (e.g. shift-click); it
    /// only takes effect when multi-sort is enabled.
    pub fn sort_toggle(&self, multi_click: bool) -> SortToggle {
        SortToggle {
            multi: multi_click && self.is_enabled(Feature::MultiSort),
            removal: self.is_enabled(Feature::SortingRemoval),
            max_columns: self.max_multi_sort_col_count,
        }
    }
}

impl Default for CanonicalConfig {
    fn default() -> Self {
        resolve(
            &GroupedOptions::default(),
            &LegacyOptions::default(),
            &Defaults::builtin(),
        )
    }
}

/// Resolve the three raw sources into the canonical record.
///
/// Never fails. Unknown fields were already dropped during parsing.
pub fn resolve(grouped: &GroupedOptions, legacy: &LegacyOptions, defaults: &Defaults) -> CanonicalConfig {
    let mut undefined = Vec::new();

    let mut features = BTreeMap::new();
    for feature in Feature::ALL {
        let value = field(
            &mut undefined,
            feature.name(),
            Some(defaults.feature(feature)),
            grouped.features.get(feature),
            legacy.flags.get(feature).as_ref(),
        );
        features.insert(feature, value.unwrap_or(false));
    }

    let display = &grouped.display;
    let flat = &legacy.display;

    CanonicalConfig {
        features,
        page_size: field(
            &mut undefined,
            "pageSize",
            Some(defaults.page_size),
            &display.page_size,
            flat.page_size.as_ref(),
        ),
        page_size_options: field(
            &mut undefined,
            "pageSizeOptions",
            Some(defaults.page_size_options.clone()),
            &display.page_size_options,
            flat.page_size_options.as_ref(),
        ),
        column_resize_mode: field(
            &mut undefined,
            "columnResizeMode",
            Some(defaults.column_resize_mode),
            &display.column_resize_mode,
            flat.column_resize_mode.as_ref(),
        ),
        density: field(
            &mut undefined,
            "density",
            Some(defaults.density),
            &display.density,
            flat.density.as_ref(),
        ),
        row_selection_mode: field(
            &mut undefined,
            "rowSelectionMode",
            Some(defaults.row_selection_mode),
            &display.row_selection_mode,
            flat.row_selection_mode.as_ref(),
        ),
        max_multi_sort_col_count: field(
            &mut undefined,
            "maxMultiSortColCount",
            defaults.max_multi_sort_col_count,
            &display.max_multi_sort_col_count,
            flat.max_multi_sort_col_count.as_ref(),
        ),
        data_mode: field(
            &mut undefined,
            "dataMode",
            Some(defaults.data_mode),
            &display.data_mode,
            flat.data_mode.as_ref(),
        ),
        undefined_fields: undefined,
    }
}

/// Resolve one field and note it if an undefined grouped key erased it.
fn field<T: Clone>(
    undefined: &mut Vec<String>,
    name: &str,
    default: Option<T>,
    grouped: &Field<T>,
    legacy: Option<&T>,
) -> Option<T> {
    let value = layer(default, grouped, legacy);
    if value.is_none() && matches!(grouped, Field::Undefined) {
        log::debug!("grouped option `{name}` is explicitly undefined and erases its default");
        undefined.push(name.to_string());
    }
    value
}

impl GridOptions {
    /// Resolve these options against a set of defaults.
    pub fn resolve(&self, defaults: &Defaults) -> CanonicalConfig {
        resolve(&self.options, &self.legacy, defaults)
    }
}
