//! Raw configuration sources.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::{
    ColumnResizeMode, DataMode, Density, DisplayGroup, Feature, FeatureGroup, LegacyDisplay,
    LegacyFlags,
};
use crate::error::ConfigError;
use crate::slice::{
    CallbackGroup, DEFAULT_PAGE_SIZE, LegacySlices, SelectionMode, SliceValue, StateGroup,
};

/// The grouped options object.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GroupedOptions {
    /// Feature toggles.
    pub features: FeatureGroup,
    /// Scalar options.
    pub display: DisplayGroup,
    /// Caller-owned slice values.
    pub state: StateGroup,
    /// Initial values for component-owned slices.
    pub initial_state: StateGroup,
    /// Change callbacks. Code only.
    #[serde(skip)]
    pub callbacks: CallbackGroup,
}

/// Legacy flat props, kept for backward compatibility.
///
/// Any prop set here wins over its grouped counterpart.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LegacyOptions {
    #[serde(flatten)]
    pub flags: LegacyFlags,
    #[serde(flatten)]
    pub display: LegacyDisplay,
    #[serde(flatten)]
    pub slices: LegacySlices,
}

/// Everything the caller supplies for one render pass.
///
/// In JSON the grouped object sits under `"options"` and legacy props sit at
/// the top level:
///
/// ```json
/// {
///   "options": { "features": { "rowSelection": true } },
///   "enableSorting": false,
///   "pageSize": 25
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    pub options: GroupedOptions,
    #[serde(flatten)]
    pub legacy: LegacyOptions,
}

impl GridOptions {
    /// Parse options from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse options from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Supply a controlled value for the next pass, as an owning caller does
    /// after a change notification.
    ///
    /// The value replaces the legacy prop when one is set, since that prop
    /// would otherwise shadow it; otherwise it goes into the grouped state.
    pub fn supply(&mut self, value: SliceValue) {
        if let Some(value) = self.legacy.slices.replace_tagged(value) {
            self.options.state.set_tagged(value);
        }
    }
}

/// Built-in defaults, the lowest configuration layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    pub features: BTreeMap<Feature, bool>,
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
    pub column_resize_mode: ColumnResizeMode,
    pub density: Density,
    pub row_selection_mode: SelectionMode,
    pub max_multi_sort_col_count: Option<usize>,
    pub data_mode: DataMode,
}

impl Defaults {
    /// The defaults compiled into the resolver.
    pub fn builtin() -> Self {
        Self {
            features: Feature::ALL
                .iter()
                .map(|f| (*f, f.default_enabled()))
                .collect(),
            page_size: DEFAULT_PAGE_SIZE,
            page_size_options: vec![5, 10, 20, 50, 100],
            column_resize_mode: ColumnResizeMode::default(),
            density: Density::default(),
            row_selection_mode: SelectionMode::default(),
            max_multi_sort_col_count: None,
            data_mode: DataMode::default(),
        }
    }

    /// Override the default for one feature.
    pub fn with_feature(mut self, feature: Feature, enabled: bool) -> Self {
        self.features.insert(feature, enabled);
        self
    }

    /// Default for a feature. Features missing from the map are off.
    pub fn feature(&self, feature: Feature) -> bool {
        self.features.get(&feature).copied().unwrap_or(false)
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Field;

    #[test]
    fn test_parse_grouped_and_legacy() {
        let options = GridOptions::from_json(
            r#"{
                "options": {
                    "features": { "sorting": false, "stickyHeader": null },
                    "display": { "pageSize": 50 },
                    "initialState": { "globalFilter": "acme" }
                },
                "enableSorting": true,
                "pageSize": 20,
                "defaultGrouping": ["team"],
                "somethingUnknown": 1
            }"#,
        )
        .unwrap();

        assert_eq!(options.options.features.sorting, Field::Value(false));
        assert_eq!(options.options.features.sticky_header, Field::Undefined);
        assert_eq!(options.options.display.page_size, Field::Value(50));
        assert_eq!(
            options.options.initial_state.global_filter,
            Field::Value("acme".to_string())
        );
        assert_eq!(options.legacy.flags.enable_sorting, Some(true));
        assert_eq!(options.legacy.display.page_size, Some(20));
        assert_eq!(options.legacy.slices.default_grouping, Some(vec!["team".to_string()]));
    }

    #[test]
    fn test_parse_empty() {
        let options = GridOptions::from_json("{}").unwrap();
        assert!(options.options.features.pagination.is_absent());
        assert!(options.legacy.flags.enable_pagination.is_none());
    }

    #[test]
    fn test_parse_error() {
        let err = GridOptions::from_json(r#"{"pageSize": "big"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = GridOptions::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_supply_replaces_legacy_value() {
        let mut options = GridOptions::from_json(r#"{"globalFilter": "old"}"#).unwrap();
        options.supply(SliceValue::GlobalFilter("new".into()));
        assert_eq!(options.legacy.slices.global_filter, Some("new".to_string()));
        assert!(options.options.state.global_filter.is_absent());
    }

    #[test]
    fn test_supply_without_legacy_value() {
        let mut options = GridOptions::default();
        options.supply(SliceValue::Grouping(vec!["team".into()]));
        assert_eq!(
            options.options.state.grouping,
            Field::Value(vec!["team".to_string()])
        );
        assert!(options.legacy.slices.grouping.is_none());
    }

    #[test]
    fn test_builtin_defaults() {
        let defaults = Defaults::builtin();
        assert!(defaults.feature(Feature::Pagination));
        assert!(!defaults.feature(Feature::RowSelection));
        assert_eq!(defaults.page_size, DEFAULT_PAGE_SIZE);
    }
}
