//! Data source trait and the server data coordinator.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::Serialize;

use super::Resource;
use crate::error::{DispatchError, FetchError};
use crate::grid::GridBindings;
use crate::slice::{ColumnFiltersState, GlobalFilterState, PaginationState, SortingState};
use crate::updater::OnChange;

/// Snapshot of the slices a server fetch depends on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchQuery {
    /// Request generation; later requests have larger numbers.
    pub generation: u64,
    pub pagination: PaginationState,
    pub sorting: SortingState,
    pub column_filters: ColumnFiltersState,
    pub global_filter: GlobalFilterState,
}

impl FetchQuery {
    /// Snapshot the current bindings.
    pub fn from_bindings(bindings: &GridBindings, generation: u64) -> Self {
        Self {
            generation,
            pagination: bindings.pagination.value,
            sorting: bindings.sorting.value.clone(),
            column_filters: bindings.column_filters.value.clone(),
            global_filter: bindings.global_filter.value.clone(),
        }
    }
}

/// One page of rows returned by a data source.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchPage<R> {
    /// Rows for the requested page.
    pub rows: Vec<R>,
    /// Total number of rows matching the query.
    pub row_count: usize,
    /// Page the server actually returned, if it differs from the request.
    pub page_index: Option<usize>,
    /// Sorting the server actually applied, if it differs from the request.
    pub sorting: Option<SortingState>,
}

impl<R> FetchPage<R> {
    /// A page with rows and a total count.
    pub fn new(rows: Vec<R>, row_count: usize) -> Self {
        Self {
            rows,
            row_count,
            page_index: None,
            sorting: None,
        }
    }
}

/// A caller-supplied, server-driven row source.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Row type produced by the source.
    type Row: Clone + Send + Sync + 'static;

    /// Fetch the rows for a query.
    async fn fetch(&self, query: FetchQuery) -> Result<FetchPage<Self::Row>, FetchError>;
}

/// What happened to a load.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The response was stored and fed back into the slices.
    Applied,
    /// A newer load was started before this one finished; the response was
    /// dropped.
    Stale { generation: u64 },
    /// The source failed. Slice values were left alone.
    Failed(FetchError),
}

/// Runs fetches against a [`DataSource`] for one grid.
///
/// Each load takes the next generation number. When a response arrives after
/// a newer load was started it is discarded, so a slow response can never
/// overwrite a fresher one.
pub struct ServerData<D: DataSource> {
    source: Arc<D>,
    resource: Resource<FetchPage<D::Row>>,
    generation: Arc<AtomicU64>,
    on_error: Option<OnChange<FetchError>>,
}

impl<D: DataSource> ServerData<D> {
    /// Wrap a data source.
    pub fn new(source: D) -> Self {
        Self {
            source: Arc::new(source),
            resource: Resource::new(),
            generation: Arc::new(AtomicU64::new(0)),
            on_error: None,
        }
    }

    /// Call `on_error` whenever a current load fails.
    pub fn with_error_handler(mut self, on_error: OnChange<FetchError>) -> Self {
        self.on_error = Some(on_error);
        self
    }

    /// The wrapped data source.
    pub fn source(&self) -> &D {
        &self.source
    }

    /// The loaded rows.
    pub fn resource(&self) -> &Resource<FetchPage<D::Row>> {
        &self.resource
    }

    /// Generation of the most recently started load.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Fetch rows for the current bindings.
    ///
    /// Fetch failures are reported through the outcome, the resource and the
    /// error handler, never as `Err`. `Err` only comes from dispatching a
    /// server correction back into a slice.
    pub async fn load(&self, bindings: &GridBindings) -> Result<LoadOutcome, DispatchError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let query = FetchQuery::from_bindings(bindings, generation);
        let requested_page = query.pagination;
        let requested_sorting = query.sorting.clone();
        let pagination = bindings.pagination.dispatch.clone();
        let sorting = bindings.sorting.dispatch.clone();

        self.resource.set_loading();
        let result = self.source.fetch(query).await;

        let latest = self.generation();
        if latest != generation {
            log::debug!("dropping response for generation {generation}, latest is {latest}");
            return Ok(LoadOutcome::Stale { generation });
        }

        match result {
            Ok(page) => {
                let page_index = page
                    .page_index
                    .unwrap_or_else(|| requested_page.clamped(page.row_count).page_index);
                let applied_sorting = page.sorting.clone();
                self.resource.set_ready(page);

                if page_index != requested_page.page_index {
                    pagination.update(move |p| PaginationState { page_index, ..*p })?;
                }
                if let Some(applied) = applied_sorting
                    && applied != requested_sorting
                {
                    sorting.set(applied)?;
                }
                Ok(LoadOutcome::Applied)
            }
            Err(err) => {
                log::debug!("fetch for generation {generation} failed: {err}");
                self.resource.set_error(err.clone());
                if let Some(on_error) = &self.on_error {
                    on_error.call(err.clone());
                }
                Ok(LoadOutcome::Failed(err))
            }
        }
    }
}

impl<D: DataSource> Clone for ServerData<D> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            resource: self.resource.clone(),
            generation: Arc::clone(&self.generation),
            on_error: self.on_error.clone(),
        }
    }
}
