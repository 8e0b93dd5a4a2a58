use std::sync::Arc;

use axum::extract::FromRef;

use crate::db::DbPool;
use crate::services::reconciliation::ReconciliationMode;

/// Shared application state injected into every handler via axum's `State`
/// extractor. Split into sub-states through `FromRef` so a handler that
/// only needs the pool (e.g. `validateBin`) doesn't have to name the
/// reconciliation boundary at all.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub reconciliation: Arc<dyn ReconciliationMode>,
    pub lock_wait_ms: LockWaitMs,
}

/// Newtype so the lock-wait budget (spec §4.3/§5) has its own `FromRef` slot
/// instead of colliding with any other `u64` a handler might extract.
#[derive(Debug, Clone, Copy)]
pub struct LockWaitMs(pub u64);

impl FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Arc<dyn ReconciliationMode> {
    fn from_ref(state: &AppState) -> Self {
        state.reconciliation.clone()
    }
}

impl FromRef<AppState> for LockWaitMs {
    fn from_ref(state: &AppState) -> Self {
        state.lock_wait_ms
    }
}
