use std::sync::Arc;

use vitals_aggregator::AggregateStore;

/// Shared application state for every route: a thin `Clone` wrapper around
/// `Arc`-held backends, passed through axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AggregateStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn AggregateStore>) -> Self {
        Self { store }
    }
}
