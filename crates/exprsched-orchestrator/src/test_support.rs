//! Shared fixtures for route-level behavioral tests. Only compiled for tests.

use std::sync::Arc;

use exprsched_core::dispatch::OperationTimings;
use exprsched_core::store::{InMemoryTaskStore, TaskStore};

use crate::state::AppState;

/// Fresh in-memory state, isolated per test.
pub(crate) fn test_state() -> AppState {
    let store: Arc<dyn TaskStore> = Arc::new(InMemoryTaskStore::new());
    AppState::new(store, OperationTimings::default())
}
