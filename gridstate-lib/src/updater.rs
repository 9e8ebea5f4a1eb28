//! Updaters and change callbacks.

use std::fmt;
use std::sync::Arc;

use crate::error::UpdaterError;

type Transform<T> = Box<dyn FnOnce(&T) -> T + Send>;
type TryTransform<T> = Box<dyn FnOnce(&T) -> Result<T, UpdaterError> + Send>;

/// The argument to a dispatcher: either the next value itself, or a function
/// computing it from the previous value.
///
/// # Example
///
/// ```ignore
/// bindings.pagination.dispatch.call(Updater::with(|p| p.previous_page()))?;
/// bindings.global_filter.dispatch.call(Updater::Value("acme".to_string()))?;
/// ```
pub enum Updater<T> {
    /// Replace the value.
    Value(T),
    /// Compute the next value from the previous one.
    Transform(Transform<T>),
    /// Compute the next value, or fail without touching state.
    TryTransform(TryTransform<T>),
}

impl<T> Updater<T> {
    /// Updater computing the next value from the previous one.
    pub fn with<F>(f: F) -> Self
    where
        F: FnOnce(&T) -> T + Send + 'static,
    {
        Self::Transform(Box::new(f))
    }

    /// Updater that may fail.
    pub fn try_with<F>(f: F) -> Self
    where
        F: FnOnce(&T) -> Result<T, UpdaterError> + Send + 'static,
    {
        Self::TryTransform(Box::new(f))
    }

    /// Returns `true` if this updater is a function of the previous value.
    pub fn is_function(&self) -> bool {
        !matches!(self, Self::Value(_))
    }

    /// Resolve against the previous value.
    pub fn resolve(self, prev: &T) -> Result<T, UpdaterError> {
        match self {
            Self::Value(v) => Ok(v),
            Self::Transform(f) => Ok(f(prev)),
            Self::TryTransform(f) => f(prev),
        }
    }
}

impl<T> From<T> for Updater<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Updater<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Transform(_) => f.write_str("Transform(..)"),
            Self::TryTransform(_) => f.write_str("TryTransform(..)"),
        }
    }
}

/// A cloneable change callback supplied by the caller.
///
/// Supplying one for a slice hands ownership of that slice's value to the
/// caller.
pub struct OnChange<T> {
    inner: Arc<dyn Fn(T) + Send + Sync + 'static>,
}

impl<T> OnChange<T> {
    /// Wrap a function or closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Invoke the callback.
    pub fn call(&self, value: T) {
        (self.inner)(value)
    }

    /// Returns `true` if both handles wrap the same function.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Clone for OnChange<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for OnChange<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnChange").finish_non_exhaustive()
    }
}

impl<T> PartialEq for OnChange<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T> Eq for OnChange<T> {}
