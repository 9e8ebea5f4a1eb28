use std::sync::{Arc, RwLock};

use crate::error::FetchError;

/// The state of an async-loadable resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ResourceState<T> {
    /// Resource has not started loading
    #[default]
    Idle,
    /// Resource is loading
    Loading,
    /// Resource loaded successfully
    Ready(T),
    /// Resource failed to load
    Error(FetchError),
}

impl<T> ResourceState<T> {
    /// Check if resource is loading
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Check if resource is ready
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Check if resource errored
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Get reference to ready value
    pub fn as_ready(&self) -> Option<&T> {
        match self {
            Self::Ready(v) => Some(v),
            _ => None,
        }
    }

    /// Get the error if present
    pub fn as_error(&self) -> Option<&FetchError> {
        match self {
            Self::Error(e) => Some(e),
            _ => None,
        }
    }
}

/// Async-loadable resource with interior mutability.
///
/// `Resource<T>` wraps a `ResourceState<T>` in an `Arc<RwLock<_>>`, so it is
/// cheap to clone and safe to hold across await points. The last ready value
/// is kept separately so a failed reload does not lose it.
#[derive(Debug)]
pub struct Resource<T> {
    inner: Arc<RwLock<ResourceState<T>>>,
    last_ready: Arc<RwLock<Option<T>>>,
}

impl<T> Resource<T> {
    /// Create a new resource in idle state
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(ResourceState::Idle)),
            last_ready: Arc::new(RwLock::new(None)),
        }
    }

    /// Get a clone of the current state
    pub fn get(&self) -> ResourceState<T>
    where
        T: Clone,
    {
        self.inner
            .read()
            .map(|guard| guard.clone())
            .unwrap_or(ResourceState::Idle)
    }

    /// The most recent ready value, surviving later loading or error states.
    pub fn last_ready(&self) -> Option<T>
    where
        T: Clone,
    {
        self.last_ready.read().ok().and_then(|guard| guard.clone())
    }

    /// Set to loading state
    pub fn set_loading(&self) {
        self.replace(ResourceState::Loading);
    }

    /// Set to ready state with value
    pub fn set_ready(&self, value: T)
    where
        T: Clone,
    {
        *self
            .last_ready
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(value.clone());
        self.replace(ResourceState::Ready(value));
    }

    /// Set to error state
    pub fn set_error(&self, err: impl Into<FetchError>) {
        self.replace(ResourceState::Error(err.into()));
    }

    fn replace(&self, state: ResourceState<T>) {
        *self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = state;
    }

    /// Check if resource is loading
    pub fn is_loading(&self) -> bool {
        self.inner
            .read()
            .map(|guard| guard.is_loading())
            .unwrap_or(false)
    }
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            last_ready: Arc::clone(&self.last_ready),
        }
    }
}
