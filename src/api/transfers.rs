use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::db::DbPool;
use crate::error::EngineResult;
use crate::models::transfer::{CommittedTransferRequest, TransferRequest, TransferResult};
use crate::services::reconciliation::ReconciliationMode;
use crate::services::{transfer_committed_service, transfer_service};
use crate::state::LockWaitMs;

/// `POST /api/transfers` — `transfer`, the free-quantity path.
pub async fn transfer_endpoint(
    State(pool): State<DbPool>,
    State(reconciliation): State<Arc<dyn ReconciliationMode>>,
    State(lock_wait_ms): State<LockWaitMs>,
    Json(request): Json<TransferRequest>,
) -> EngineResult<Json<TransferResult>> {
    let output = transfer_service::transfer(&pool, reconciliation.as_ref(), &request, lock_wait_ms.0).await?;
    tracing::debug!(document_no = %output.result.document_no, "receipt projected for transfer");
    Ok(Json(output.result))
}

/// `POST /api/transfers/committed` — `transferCommitted`, the committed-quantity path.
pub async fn transfer_committed_endpoint(
    State(pool): State<DbPool>,
    State(reconciliation): State<Arc<dyn ReconciliationMode>>,
    State(lock_wait_ms): State<LockWaitMs>,
    Json(request): Json<CommittedTransferRequest>,
) -> EngineResult<Json<TransferResult>> {
    let output = transfer_committed_service::transfer_committed(
        &pool,
        reconciliation.as_ref(),
        &request,
        lock_wait_ms.0,
    )
    .await?;
    tracing::debug!(document_no = %output.result.document_no, "receipt projected for committed transfer");
    Ok(Json(output.result))
}
