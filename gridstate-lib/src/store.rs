//! The slice store: internal values for component-owned slices.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::config::{CanonicalConfig, GridOptions, layer};
use crate::slice::*;

/// One store entry.
///
/// Uses `Arc<RwLock<T>>` internally, so clones share the entry. Every write
/// bumps the owning store's revision.
#[derive(Debug)]
pub struct StoreCell<T> {
    inner: Arc<RwLock<T>>,
    revision: Arc<AtomicU64>,
}

impl<T> StoreCell<T> {
    fn new(value: T, revision: Arc<AtomicU64>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(value)),
            revision,
        }
    }

    /// Get a clone of the current value
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.inner
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Replace the value
    pub fn set(&self, value: T) {
        *self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = value;
        self.revision.fetch_add(1, Ordering::SeqCst);
    }
}

impl<T> Clone for StoreCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            revision: Arc::clone(&self.revision),
        }
    }
}

/// Resolve a slice's initial value.
///
/// Same precedence as the config resolver, applied to `initialState` and the
/// legacy `default*` props. A slice has no "undefined" value, so an erased
/// initial value falls back to the slice's built-in value.
pub fn initial_value<S: Slice>(options: &GridOptions, config: &CanonicalConfig) -> S::Value {
    layer(
        Some(S::fallback(config)),
        S::grouped(&options.options.initial_state),
        S::legacy_initial(&options.legacy.slices),
    )
    .unwrap_or_else(|| S::fallback(config))
}

macro_rules! define_store {
    ($(($marker:ident, $field:ident, $value:ty, $default:ident, $on_change:ident, $seed:ident)),* $(,)?) => {
        /// Internal values for every slice of one grid.
        ///
        /// Entries are independent: writing one never touches another. The
        /// store belongs to a single grid and is never shared.
        #[derive(Debug)]
        pub struct SliceStore {
            $(pub(crate) $field: StoreCell<$value>,)*
            revision: Arc<AtomicU64>,
        }

        impl SliceStore {
            /// Seed a store from resolved initial values.
            pub fn seed(options: &GridOptions, config: &CanonicalConfig) -> Self {
                let revision = Arc::new(AtomicU64::new(0));
                Self {
                    $($field: StoreCell::new(
                        initial_value::<$marker>(options, config),
                        Arc::clone(&revision),
                    ),)*
                    revision,
                }
            }
        }
    };
}

for_each_slice!(define_store);

impl SliceStore {
    /// Read a slice's stored value.
    pub fn get<S: Slice>(&self) -> S::Value {
        S::cell(self).get()
    }

    /// Write a slice's stored value.
    pub fn set<S: Slice>(&self, value: S::Value) {
        S::cell(self).set(value)
    }

    /// Number of writes since the store was seeded.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Defaults, Field};

    fn seeded(options: &GridOptions) -> SliceStore {
        SliceStore::seed(options, &options.resolve(&Defaults::builtin()))
    }

    #[test]
    fn test_seed_from_fallbacks() {
        let store = seeded(&GridOptions::default());
        assert_eq!(store.get::<Pagination>(), PaginationState::new(DEFAULT_PAGE_SIZE));
        assert!(store.get::<Sorting>().is_empty());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_seed_precedence() {
        let mut options = GridOptions::default();
        options.options.initial_state.global_filter = Field::Value("grouped".into());
        options.legacy.slices.default_global_filter = Some("legacy".into());
        options.options.initial_state.grouping = Field::Value(vec!["team".into()]);
        let store = seeded(&options);
        assert_eq!(store.get::<GlobalFilter>(), "legacy");
        assert_eq!(store.get::<Grouping>(), vec!["team"]);
    }

    #[test]
    fn test_seed_pagination_follows_page_size() {
        let mut options = GridOptions::default();
        options.legacy.display.page_size = Some(25);
        let store = seeded(&options);
        assert_eq!(store.get::<Pagination>().page_size, 25);
    }

    #[test]
    fn test_undefined_initial_falls_back() {
        let mut options = GridOptions::default();
        options.options.initial_state.sorting = Field::Undefined;
        let store = seeded(&options);
        assert!(store.get::<Sorting>().is_empty());
    }

    #[test]
    fn test_entries_are_independent() {
        let store = seeded(&GridOptions::default());
        store.set::<Sorting>(vec![ColumnSort::asc("name")]);
        assert_eq!(store.get::<Sorting>(), vec![ColumnSort::asc("name")]);
        assert!(store.get::<Grouping>().is_empty());
        assert!(store.get::<ColumnFilters>().is_empty());
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_set_after_poisoned_lock() {
        let store = seeded(&GridOptions::default());
        let cell = store.global_filter.clone();
        let _ = std::thread::spawn(move || {
            let _guard = cell.inner.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        store.set::<GlobalFilter>("after".into());
        assert_eq!(store.get::<GlobalFilter>(), "after");
        assert_eq!(store.revision(), 1);
    }
}
