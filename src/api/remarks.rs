use axum::extract::State;
use axum::Json;

use crate::db::DbPool;
use crate::error::EngineResult;
use crate::models::remark::RemarkOption;
use crate::services::remarks_service;

/// `GET /api/remarks` — `listRemarks`.
pub async fn list_remarks_endpoint(State(pool): State<DbPool>) -> EngineResult<Json<Vec<RemarkOption>>> {
    let remarks = remarks_service::list_remarks(&pool).await?;
    Ok(Json(remarks))
}
