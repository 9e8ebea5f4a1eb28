//! The ownership classifier.
//!
//! A slice is controlled if and only if the caller supplies a change callback
//! for it in the current options. Nothing else is consulted, not even a
//! caller-supplied value. Classification runs on every pass, so adding or
//! removing a callback flips ownership without carrying the value across.

use crate::config::{GridOptions, layer};
use crate::slice::Slice;
use crate::updater::OnChange;

/// Who owns a slice's value for the current pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ownership<T> {
    /// The grid's store owns the value.
    Owned,
    /// The caller owns the value and is notified through the callback.
    Delegated(OnChange<T>),
}

impl<T> Ownership<T> {
    /// Returns `true` if the caller owns the value.
    pub fn is_controlled(&self) -> bool {
        matches!(self, Self::Delegated(_))
    }
}

/// Classify a slice for the given options.
///
/// Grouped and legacy callbacks are layered like any other field, so a legacy
/// callback wins and an explicitly undefined grouped callback counts as none.
pub fn classify<S: Slice>(options: &GridOptions) -> Ownership<S::Value> {
    match resolve_callback::<S>(options) {
        Some(on_change) => Ownership::Delegated(on_change),
        None => Ownership::Owned,
    }
}

/// Shorthand for `classify::<S>(options).is_controlled()`.
pub fn is_controlled<S: Slice>(options: &GridOptions) -> bool {
    classify::<S>(options).is_controlled()
}

/// The caller's change callback for a slice, if any.
pub fn resolve_callback<S: Slice>(options: &GridOptions) -> Option<OnChange<S::Value>> {
    layer(
        None,
        S::grouped_callback(&options.options.callbacks),
        S::legacy_callback(&options.legacy.slices),
    )
}

/// The caller-supplied value for a slice, if any.
pub fn resolve_controlled_value<S: Slice>(options: &GridOptions) -> Option<S::Value> {
    layer(
        None,
        S::grouped(&options.options.state),
        S::legacy(&options.legacy.slices),
    )
}
