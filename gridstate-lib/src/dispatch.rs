//! The updater dispatcher.

use std::fmt;

use crate::error::DispatchError;
use crate::ownership::Ownership;
use crate::slice::{Slice, SliceName, SliceValue};
use crate::store::StoreCell;
use crate::updater::Updater;

/// Dispatcher for one slice, built fresh for every pass.
///
/// A controlled dispatcher resolves updaters against the caller's value as it
/// stood when the binding was built, hands the result to the caller's
/// callback, and does nothing else. The caller is expected to supply the new
/// value on the next pass.
///
/// An uncontrolled dispatcher resolves against the store's live value and
/// writes the result back. The write happens only after the updater
/// succeeds.
pub struct Dispatch<T> {
    slice: SliceName,
    ownership: Ownership<T>,
    current: T,
    cell: StoreCell<T>,
}

impl<T: Clone + fmt::Debug> Dispatch<T> {
    pub(crate) fn new(slice: SliceName, ownership: Ownership<T>, current: T, cell: StoreCell<T>) -> Self {
        Self {
            slice,
            ownership,
            current,
            cell,
        }
    }

    /// The slice this dispatcher updates.
    pub fn slice(&self) -> SliceName {
        self.slice
    }

    /// Returns `true` if updates go to the caller's callback.
    pub fn is_controlled(&self) -> bool {
        self.ownership.is_controlled()
    }

    /// Apply an updater.
    pub fn call(&self, updater: Updater<T>) -> Result<(), DispatchError> {
        match &self.ownership {
            Ownership::Delegated(on_change) => {
                let next = self.resolve(updater, &self.current)?;
                log::debug!("dispatch `{}`: notifying caller with {next:?}", self.slice);
                on_change.call(next);
            }
            Ownership::Owned => {
                let prev = self.cell.get();
                let next = self.resolve(updater, &prev)?;
                log::debug!("dispatch `{}`: storing {next:?}", self.slice);
                self.cell.set(next);
            }
        }
        Ok(())
    }

    /// Replace the value.
    pub fn set(&self, value: T) -> Result<(), DispatchError> {
        self.call(Updater::Value(value))
    }

    /// Compute the next value from the previous one.
    pub fn update<F>(&self, f: F) -> Result<(), DispatchError>
    where
        F: FnOnce(&T) -> T + Send + 'static,
    {
        self.call(Updater::with(f))
    }

    fn resolve(&self, updater: Updater<T>, prev: &T) -> Result<T, DispatchError> {
        updater.resolve(prev).map_err(|source| {
            log::debug!("dispatch `{}`: updater failed: {source}", self.slice);
            DispatchError::Updater {
                slice: self.slice,
                source,
            }
        })
    }

    /// Dispatch a tagged value, checking it belongs to this slice.
    pub fn set_tagged<S>(&self, value: SliceValue) -> Result<(), DispatchError>
    where
        S: Slice<Value = T>,
    {
        match S::extract(value) {
            Ok(v) => self.set(v),
            Err(other) => Err(DispatchError::SliceMismatch {
                expected: self.slice,
                found: other.name(),
            }),
        }
    }
}

impl<T: Clone> Clone for Dispatch<T> {
    fn clone(&self) -> Self {
        Self {
            slice: self.slice,
            ownership: self.ownership.clone(),
            current: self.current.clone(),
            cell: self.cell.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Dispatch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatch")
            .field("slice", &self.slice)
            .field("controlled", &self.ownership.is_controlled())
            .field("current", &self.current)
            .finish()
    }
}
