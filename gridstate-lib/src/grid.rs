//! The reconciliation facade.
//!
//! A [`Grid`] is one logical grid instance. It owns the slice store and, on
//! every pass, turns the caller's options into [`GridBindings`]: the canonical
//! configuration plus a `(value, dispatch)` pair per slice, ready for the
//! engine.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;

use crate::config::{CanonicalConfig, Defaults, GridOptions};
use crate::dispatch::Dispatch;
use crate::error::DispatchError;
use crate::ownership::{classify, resolve_controlled_value};
use crate::slice::*;
use crate::store::SliceStore;

/// Unique identifier for a grid instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridId(usize);

impl GridId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl fmt::Display for GridId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "__grid_{}", self.0)
    }
}

/// The authoritative value of one slice for this pass, and its dispatcher.
#[derive(Debug, Clone)]
pub struct Binding<T> {
    /// Current authoritative value.
    pub value: T,
    /// Dispatcher closed over this slice.
    pub dispatch: Dispatch<T>,
}

impl<T: Clone + fmt::Debug> Binding<T> {
    /// Returns `true` if the caller owns this slice.
    pub fn is_controlled(&self) -> bool {
        self.dispatch.is_controlled()
    }
}

/// Value and ownership of one slice, for the map view of the bindings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliceSnapshot {
    pub value: SliceValue,
    pub controlled: bool,
}

/// A logical grid instance.
#[derive(Debug)]
pub struct Grid {
    id: GridId,
    defaults: Defaults,
    store: SliceStore,
    // Ownership seen on the previous pass, to report flips.
    last_ownership: Mutex<HashMap<SliceName, bool>>,
    // Undefined grouped options already warned about.
    reported_undefined: Mutex<BTreeSet<String>>,
}

impl Grid {
    /// Create a grid, seeding its store from the first pass's options.
    pub fn new(options: &GridOptions) -> Self {
        Self::with_defaults(options, Defaults::builtin())
    }

    /// Create a grid with custom built-in defaults.
    pub fn with_defaults(options: &GridOptions, defaults: Defaults) -> Self {
        let config = options.resolve(&defaults);
        let store = SliceStore::seed(options, &config);
        let id = GridId::new();
        log::debug!("grid {id} created");
        Self {
            id,
            defaults,
            store,
            last_ownership: Mutex::new(HashMap::new()),
            reported_undefined: Mutex::new(BTreeSet::new()),
        }
    }

    /// Get the unique ID.
    pub fn id(&self) -> GridId {
        self.id
    }

    /// The defaults this grid resolves against.
    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// The grid's internal store.
    pub fn store(&self) -> &SliceStore {
        &self.store
    }

    /// Resolve options into the canonical configuration.
    pub fn resolve(&self, options: &GridOptions) -> CanonicalConfig {
        options.resolve(&self.defaults)
    }

    /// Build the bindings for one pass.
    ///
    /// Call again whenever the options change or the store is written;
    /// bindings from an earlier pass hold the values of that pass.
    pub fn bind(&self, options: &GridOptions) -> GridBindings {
        let config = self.resolve(options);
        self.note_undefined(&config);
        let revision = self.store.revision();
        let bindings = GridBindings::build(self, options, config, revision);
        self.note_ownership(&bindings);
        bindings
    }

    /// Build a single slice's binding.
    ///
    /// The value is the caller's when the slice is controlled and the caller
    /// supplied one; otherwise it is the store's.
    pub fn bind_slice<S: Slice>(&self, options: &GridOptions) -> Binding<S::Value> {
        let ownership = classify::<S>(options);
        let cell = S::cell(&self.store);
        let value = if ownership.is_controlled() {
            resolve_controlled_value::<S>(options).unwrap_or_else(|| cell.get())
        } else {
            cell.get()
        };
        Binding {
            dispatch: Dispatch::new(S::NAME, ownership, value.clone(), cell.clone()),
            value,
        }
    }

    /// Warn about explicitly undefined grouped options, once per grid.
    /// Returns the names warned about on this pass.
    fn note_undefined(&self, config: &CanonicalConfig) -> Vec<String> {
        let Ok(mut reported) = self.reported_undefined.lock() else {
            return Vec::new();
        };
        let fresh: Vec<String> = config
            .undefined_fields
            .iter()
            .filter(|name| reported.insert((*name).clone()))
            .cloned()
            .collect();
        for name in &fresh {
            log::warn!(
                "grid {}: grouped option `{name}` is explicitly undefined and erases its default",
                self.id
            );
        }
        fresh
    }

    fn note_ownership(&self, bindings: &GridBindings) {
        let Ok(mut last) = self.last_ownership.lock() else {
            return;
        };
        for name in SliceName::ALL {
            let controlled = bindings.is_controlled(*name);
            if let Some(previous) = last.insert(*name, controlled)
                && previous != controlled
            {
                log::debug!(
                    "grid {}: `{name}` ownership flipped to {}",
                    self.id,
                    if controlled { "controlled" } else { "uncontrolled" }
                );
            }
        }
    }
}

macro_rules! define_bindings {
    ($(($marker:ident, $field:ident, $value:ty, $default:ident, $on_change:ident, $seed:ident)),* $(,)?) => {
        /// Everything the engine consumes for one pass.
        #[derive(Debug, Clone)]
        pub struct GridBindings {
            /// Canonical configuration for this pass.
            pub config: CanonicalConfig,
            $(pub $field: Binding<$value>,)*
            grid: GridId,
            revision: u64,
        }

        impl GridBindings {
            fn build(grid: &Grid, options: &GridOptions, config: CanonicalConfig, revision: u64) -> Self {
                Self {
                    config,
                    $($field: grid.bind_slice::<$marker>(options),)*
                    grid: grid.id,
                    revision,
                }
            }

            /// Returns `true` if the caller owns the named slice.
            pub fn is_controlled(&self, name: SliceName) -> bool {
                match name {
                    $(SliceName::$marker => self.$field.is_controlled(),)*
                }
            }

            /// The named slice's current value.
            pub fn value(&self, name: SliceName) -> SliceValue {
                match name {
                    $(SliceName::$marker => SliceValue::$marker(self.$field.value.clone()),)*
                }
            }

            /// Route a tagged value to its slice's dispatcher.
            pub fn dispatch_value(&self, value: SliceValue) -> Result<(), DispatchError> {
                match value {
                    $(SliceValue::$marker(v) => self.$field.dispatch.set(v),)*
                }
            }
        }
    };
}

for_each_slice!(define_bindings);

impl GridBindings {
    /// Get a slice's binding by marker type.
    pub fn get<S: Slice>(&self) -> &Binding<S::Value> {
        S::binding(self)
    }

    /// Map view: every slice's value and ownership.
    pub fn snapshot(&self) -> BTreeMap<SliceName, SliceSnapshot> {
        SliceName::ALL
            .iter()
            .map(|name| {
                (
                    *name,
                    SliceSnapshot {
                        value: self.value(*name),
                        controlled: self.is_controlled(*name),
                    },
                )
            })
            .collect()
    }

    /// Returns `true` if the grid's store was written after these bindings
    /// were built, or if they belong to another grid.
    pub fn is_stale(&self, grid: &Grid) -> bool {
        self.grid != grid.id || self.revision != grid.store.revision()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_reads_store() {
        let options = GridOptions::default();
        let grid = Grid::new(&options);
        let bindings = grid.bind(&options);
        assert_eq!(bindings.pagination.value, PaginationState::default());
        assert!(!bindings.pagination.is_controlled());
        assert_eq!(bindings.snapshot().len(), SliceName::ALL.len());
    }

    #[test]
    fn test_stale_after_write() {
        let options = GridOptions::default();
        let grid = Grid::new(&options);
        let bindings = grid.bind(&options);
        assert!(!bindings.is_stale(&grid));
        bindings.global_filter.dispatch.set("x".into()).unwrap();
        assert!(bindings.is_stale(&grid));
        assert!(!grid.bind(&options).is_stale(&grid));
    }

    #[test]
    fn test_bindings_belong_to_their_grid() {
        let options = GridOptions::default();
        let a = Grid::new(&options);
        let b = Grid::new(&options);
        assert_ne!(a.id(), b.id());
        assert!(a.bind(&options).is_stale(&b));
    }

    #[test]
    fn test_dispatch_value_routes_by_tag() {
        let options = GridOptions::default();
        let grid = Grid::new(&options);
        grid.bind(&options)
            .dispatch_value(SliceValue::Grouping(vec!["team".into()]))
            .unwrap();
        assert_eq!(grid.bind(&options).grouping.value, vec!["team"]);
    }

    #[test]
    fn test_set_tagged_rejects_other_slice() {
        let options = GridOptions::default();
        let grid = Grid::new(&options);
        let bindings = grid.bind(&options);
        let err = bindings
            .sorting
            .dispatch
            .set_tagged::<Sorting>(SliceValue::GlobalFilter("x".into()))
            .unwrap_err();
        assert_eq!(
            err,
            DispatchError::SliceMismatch {
                expected: SliceName::Sorting,
                found: SliceName::GlobalFilter,
            }
        );
    }

    #[test]
    fn test_undefined_options_reported_once() {
        let mut options = GridOptions::default();
        options.options.features.sticky_header = crate::config::Field::Undefined;
        let grid = Grid::new(&options);
        let config = grid.resolve(&options);
        assert!(!config.undefined_fields.is_empty());

        assert_eq!(grid.note_undefined(&config), config.undefined_fields);
        grid.bind(&options);
        assert!(grid.note_undefined(&config).is_empty());
    }
}
