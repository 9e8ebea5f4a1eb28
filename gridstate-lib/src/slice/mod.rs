//! Grid state slices.
//!
//! Every slice is a zero-sized marker type implementing [`Slice`]. The marker
//! ties together the slice's value type, its name, and where it lives in each
//! raw configuration source, in the store and in the bindings.

mod selection;
mod values;

pub use selection::*;
pub use values::*;

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::{CanonicalConfig, Field};
use crate::grid::{Binding, GridBindings};
use crate::store::{SliceStore, StoreCell};
use crate::updater::OnChange;

/// Invoke `$callback!` with the full slice table.
///
/// Each row is `(Marker, field, Value, legacy_default_field,
/// legacy_callback_field, seed_fn)`.
macro_rules! for_each_slice {
    ($callback:ident) => {
        $callback! {
            (Pagination, pagination, PaginationState, default_pagination, on_pagination_change, seed_pagination),
            (Sorting, sorting, SortingState, default_sorting, on_sorting_change, seed_default),
            (ColumnFilters, column_filters, ColumnFiltersState, default_column_filters, on_column_filters_change, seed_default),
            (GlobalFilter, global_filter, GlobalFilterState, default_global_filter, on_global_filter_change, seed_default),
            (ColumnVisibility, column_visibility, VisibilityState, default_column_visibility, on_column_visibility_change, seed_default),
            (RowSelection, row_selection, RowSelectionState, default_row_selection, on_row_selection_change, seed_default),
            (Expanded, expanded, ExpandedState, default_expanded, on_expanded_change, seed_default),
            (ColumnOrder, column_order, ColumnOrderState, default_column_order, on_column_order_change, seed_default),
            (ColumnPinning, column_pinning, ColumnPinningState, default_column_pinning, on_column_pinning_change, seed_default),
            (ColumnSizing, column_sizing, ColumnSizingState, default_column_sizing, on_column_sizing_change, seed_default),
            (Grouping, grouping, GroupingState, default_grouping, on_grouping_change, seed_default),
        }
    };
}
pub(crate) use for_each_slice;

/// A named unit of grid state.
pub trait Slice: Send + Sync + 'static {
    /// The slice's value.
    type Value: Clone
        + PartialEq
        + fmt::Debug
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;

    /// The slice's name.
    const NAME: SliceName;

    /// Built-in value used when no source supplies an initial value.
    fn fallback(config: &CanonicalConfig) -> Self::Value;

    /// The slice's field in a grouped state object.
    fn grouped(group: &StateGroup) -> &Field<Self::Value>;

    /// The slice's grouped change callback.
    fn grouped_callback(group: &CallbackGroup) -> &Field<OnChange<Self::Value>>;

    /// The slice's legacy controlled value.
    fn legacy(legacy: &LegacySlices) -> Option<&Self::Value>;

    /// The slice's legacy initial value.
    fn legacy_initial(legacy: &LegacySlices) -> Option<&Self::Value>;

    /// The slice's legacy change callback.
    fn legacy_callback(legacy: &LegacySlices) -> Option<&OnChange<Self::Value>>;

    /// The slice's entry in a store.
    fn cell(store: &SliceStore) -> &StoreCell<Self::Value>;

    /// The slice's binding.
    fn binding(bindings: &GridBindings) -> &Binding<Self::Value>;

    /// Tag a value with this slice.
    fn wrap(value: Self::Value) -> SliceValue;

    /// Take a value back out of its tag.
    fn extract(value: SliceValue) -> Result<Self::Value, SliceValue>;
}

fn seed_default<T: Default>(_config: &CanonicalConfig) -> T {
    T::default()
}

fn seed_pagination(config: &CanonicalConfig) -> PaginationState {
    PaginationState::new(config.page_size.unwrap_or(DEFAULT_PAGE_SIZE))
}

macro_rules! define_slices {
    ($(($marker:ident, $field:ident, $value:ty, $default:ident, $on_change:ident, $seed:ident)),* $(,)?) => {
        /// Name of a slice.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub enum SliceName {
            $($marker,)*
        }

        impl SliceName {
            /// Every slice, in binding order.
            pub const ALL: &'static [SliceName] = &[$(SliceName::$marker,)*];
        }

        $(
            #[doc = concat!("Marker for the `", stringify!($field), "` slice.")]
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
            pub struct $marker;

            impl Slice for $marker {
                type Value = $value;

                const NAME: SliceName = SliceName::$marker;

                fn fallback(config: &CanonicalConfig) -> Self::Value {
                    $seed(config)
                }

                fn grouped(group: &StateGroup) -> &Field<Self::Value> {
                    &group.$field
                }

                fn grouped_callback(group: &CallbackGroup) -> &Field<OnChange<Self::Value>> {
                    &group.$field
                }

                fn legacy(legacy: &LegacySlices) -> Option<&Self::Value> {
                    legacy.$field.as_ref()
                }

                fn legacy_initial(legacy: &LegacySlices) -> Option<&Self::Value> {
                    legacy.$default.as_ref()
                }

                fn legacy_callback(legacy: &LegacySlices) -> Option<&OnChange<Self::Value>> {
                    legacy.$on_change.as_ref()
                }

                fn cell(store: &SliceStore) -> &StoreCell<Self::Value> {
                    &store.$field
                }

                fn binding(bindings: &GridBindings) -> &Binding<Self::Value> {
                    &bindings.$field
                }

                fn wrap(value: Self::Value) -> SliceValue {
                    SliceValue::$marker(value)
                }

                fn extract(value: SliceValue) -> Result<Self::Value, SliceValue> {
                    match value {
                        SliceValue::$marker(v) => Ok(v),
                        other => Err(other),
                    }
                }
            }
        )*

        /// A slice value tagged with its slice.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "slice", content = "value", rename_all = "camelCase")]
        pub enum SliceValue {
            $($marker($value),)*
        }

        impl SliceValue {
            /// The slice this value belongs to.
            pub fn name(&self) -> SliceName {
                match self {
                    $(Self::$marker(_) => SliceName::$marker,)*
                }
            }
        }

        /// One field per slice in the grouped `state` / `initialState` objects.
        #[derive(Debug, Clone, Default, PartialEq, Deserialize)]
        #[serde(default, rename_all = "camelCase")]
        pub struct StateGroup {
            $(pub $field: Field<$value>,)*
        }

        impl StateGroup {
            /// Set the field matching a tagged value.
            pub fn set_tagged(&mut self, value: SliceValue) {
                match value {
                    $(SliceValue::$marker(v) => self.$field = Field::Value(v),)*
                }
            }
        }

        /// One change callback per slice in the grouped options object.
        #[derive(Debug, Clone, Default)]
        pub struct CallbackGroup {
            $(pub $field: Field<OnChange<$value>>,)*
        }

        impl CallbackGroup {
            /// Take control of a slice with a callback that receives tagged
            /// values.
            pub fn set_tagged(&mut self, name: SliceName, on_change: OnChange<SliceValue>) {
                match name {
                    $(SliceName::$marker => {
                        self.$field = Field::Value(OnChange::new(move |v| {
                            on_change.call(SliceValue::$marker(v))
                        }));
                    })*
                }
            }
        }

        /// Legacy flat per-slice props: controlled value, initial value and
        /// change callback.
        #[derive(Debug, Clone, Default, PartialEq, Deserialize)]
        #[serde(default, rename_all = "camelCase")]
        pub struct LegacySlices {
            $(
                pub $field: Option<$value>,
                pub $default: Option<$value>,
                #[serde(skip)]
                pub $on_change: Option<OnChange<$value>>,
            )*
        }

        impl LegacySlices {
            /// Overwrite the controlled prop matching a tagged value.
            ///
            /// Only a prop that is already set is overwritten; otherwise the
            /// value is handed back.
            pub fn replace_tagged(&mut self, value: SliceValue) -> Option<SliceValue> {
                match value {
                    $(SliceValue::$marker(v) => match &mut self.$field {
                        Some(slot) => {
                            *slot = v;
                            None
                        }
                        None => Some(SliceValue::$marker(v)),
                    },)*
                }
            }
        }
    };
}

for_each_slice!(define_slices);

impl SliceName {
    /// The slice's key in options objects.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pagination => "pagination",
            Self::Sorting => "sorting",
            Self::ColumnFilters => "columnFilters",
            Self::GlobalFilter => "globalFilter",
            Self::ColumnVisibility => "columnVisibility",
            Self::RowSelection => "rowSelection",
            Self::Expanded => "expanded",
            Self::ColumnOrder => "columnOrder",
            Self::ColumnPinning => "columnPinning",
            Self::ColumnSizing => "columnSizing",
            Self::Grouping => "grouping",
        }
    }
}

/// Error returned when parsing an unknown slice name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown slice `{0}`")]
pub struct ParseSliceNameError(pub String);

impl FromStr for SliceName {
    type Err = ParseSliceNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SliceName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| ParseSliceNameError(s.to_string()))
    }
}

impl fmt::Display for SliceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
