//! Feature flags and their grouped and legacy sources.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Field;

/// A toggleable grid feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Feature {
    Pagination,
    Sorting,
    MultiSort,
    ColumnFilters,
    GlobalFilter,
    ColumnResizing,
    RowSelection,
    Expanding,
    ColumnOrdering,
    Pinning,
    StickyHeader,
    Grouping,
    FormMode,
    Virtualization,
    SortingRemoval,
}

impl Feature {
    /// Every feature, in resolution order.
    pub const ALL: [Feature; 15] = [
        Feature::Pagination,
        Feature::Sorting,
        Feature::MultiSort,
        Feature::ColumnFilters,
        Feature::GlobalFilter,
        Feature::ColumnResizing,
        Feature::RowSelection,
        Feature::Expanding,
        Feature::ColumnOrdering,
        Feature::Pinning,
        Feature::StickyHeader,
        Feature::Grouping,
        Feature::FormMode,
        Feature::Virtualization,
        Feature::SortingRemoval,
    ];

    /// The feature's key in the grouped options object.
    pub fn name(self) -> &'static str {
        match self {
            Self::Pagination => "pagination",
            Self::Sorting => "sorting",
            Self::MultiSort => "multiSort",
            Self::ColumnFilters => "columnFilters",
            Self::GlobalFilter => "globalFilter",
            Self::ColumnResizing => "columnResizing",
            Self::RowSelection => "rowSelection",
            Self::Expanding => "expanding",
            Self::ColumnOrdering => "columnOrdering",
            Self::Pinning => "pinning",
            Self::StickyHeader => "stickyHeader",
            Self::Grouping => "grouping",
            Self::FormMode => "formMode",
            Self::Virtualization => "virtualization",
            Self::SortingRemoval => "sortingRemoval",
        }
    }

    /// Built-in default for the feature.
    pub fn default_enabled(self) -> bool {
        matches!(
            self,
            Self::Pagination
                | Self::Sorting
                | Self::ColumnFilters
                | Self::GlobalFilter
                | Self::SortingRemoval
        )
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Feature toggles from the grouped options object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeatureGroup {
    pub pagination: Field<bool>,
    pub sorting: Field<bool>,
    pub multi_sort: Field<bool>,
    pub column_filters: Field<bool>,
    pub global_filter: Field<bool>,
    pub column_resizing: Field<bool>,
    pub row_selection: Field<bool>,
    pub expanding: Field<bool>,
    pub column_ordering: Field<bool>,
    pub pinning: Field<bool>,
    pub sticky_header: Field<bool>,
    pub grouping: Field<bool>,
    pub form_mode: Field<bool>,
    pub virtualization: Field<bool>,
    pub sorting_removal: Field<bool>,
}

impl FeatureGroup {
    /// Get the grouped field for a feature.
    pub fn get(&self, feature: Feature) -> &Field<bool> {
        match feature {
            Feature::Pagination => &self.pagination,
            Feature::Sorting => &self.sorting,
            Feature::MultiSort => &self.multi_sort,
            Feature::ColumnFilters => &self.column_filters,
            Feature::GlobalFilter => &self.global_filter,
            Feature::ColumnResizing => &self.column_resizing,
            Feature::RowSelection => &self.row_selection,
            Feature::Expanding => &self.expanding,
            Feature::ColumnOrdering => &self.column_ordering,
            Feature::Pinning => &self.pinning,
            Feature::StickyHeader => &self.sticky_header,
            Feature::Grouping => &self.grouping,
            Feature::FormMode => &self.form_mode,
            Feature::Virtualization => &self.virtualization,
            Feature::SortingRemoval => &self.sorting_removal,
        }
    }

    /// Set a grouped field, returning the group for chaining.
    pub fn with(mut self, feature: Feature, field: impl Into<Field<bool>>) -> Self {
        let slot = match feature {
            Feature::Pagination => &mut self.pagination,
            Feature::Sorting => &mut self.sorting,
            Feature::MultiSort => &mut self.multi_sort,
            Feature::ColumnFilters => &mut self.column_filters,
            Feature::GlobalFilter => &mut self.global_filter,
            Feature::ColumnResizing => &mut self.column_resizing,
            Feature::RowSelection => &mut self.row_selection,
            Feature::Expanding => &mut self.expanding,
            Feature::ColumnOrdering => &mut self.column_ordering,
            Feature::Pinning => &mut self.pinning,
            Feature::StickyHeader => &mut self.sticky_header,
            Feature::Grouping => &mut self.grouping,
            Feature::FormMode => &mut self.form_mode,
            Feature::Virtualization => &mut self.virtualization,
            Feature::SortingRemoval => &mut self.sorting_removal,
        };
        *slot = field.into();
        self
    }
}

/// Legacy `enable*` props, one per feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyFlags {
    pub enable_pagination: Option<bool>,
    pub enable_sorting: Option<bool>,
    pub enable_multi_sort: Option<bool>,
    pub enable_column_filters: Option<bool>,
    pub enable_global_filter: Option<bool>,
    pub enable_column_resizing: Option<bool>,
    pub enable_row_selection: Option<bool>,
    pub enable_expanding: Option<bool>,
    pub enable_column_ordering: Option<bool>,
    pub enable_pinning: Option<bool>,
    pub enable_sticky_header: Option<bool>,
    pub enable_grouping: Option<bool>,
    pub enable_form_mode: Option<bool>,
    pub enable_virtualization: Option<bool>,
    pub enable_sorting_removal: Option<bool>,
}

impl LegacyFlags {
    /// Get the legacy flag for a feature, if set.
    pub fn get(&self, feature: Feature) -> Option<bool> {
        match feature {
            Feature::Pagination => self.enable_pagination,
            Feature::Sorting => self.enable_sorting,
            Feature::MultiSort => self.enable_multi_sort,
            Feature::ColumnFilters => self.enable_column_filters,
            Feature::GlobalFilter => self.enable_global_filter,
            Feature::ColumnResizing => self.enable_column_resizing,
            Feature::RowSelection => self.enable_row_selection,
            Feature::Expanding => self.enable_expanding,
            Feature::ColumnOrdering => self.enable_column_ordering,
            Feature::Pinning => self.enable_pinning,
            Feature::StickyHeader => self.enable_sticky_header,
            Feature::Grouping => self.enable_grouping,
            Feature::FormMode => self.enable_form_mode,
            Feature::Virtualization => self.enable_virtualization,
            Feature::SortingRemoval => self.enable_sorting_removal,
        }
    }
}
