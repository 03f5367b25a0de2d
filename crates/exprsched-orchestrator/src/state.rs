//! Shared application state handed to every route handler.

use std::sync::Arc;

use exprsched_core::dispatch::OperationTimings;
use exprsched_core::store::TaskStore;

/// Cheaply cloneable: both fields are already behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TaskStore>,
    pub timings: Arc<OperationTimings>,
}

impl AppState {
    pub fn new(store: Arc<dyn TaskStore>, timings: OperationTimings) -> Self {
        Self {
            store,
            timings: Arc::new(timings),
        }
    }
}
