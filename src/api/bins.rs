use axum::extract::{Path, State};
use axum::Json;

use crate::db::DbPool;
use crate::error::EngineResult;
use crate::models::bin::BinValidation;
use crate::services::bin_service;

/// `GET /api/bins/:location/:binNo/validate` — `validateBin`.
pub async fn validate_bin_endpoint(
    State(pool): State<DbPool>,
    Path((location, bin_no)): Path<(String, String)>,
) -> EngineResult<Json<BinValidation>> {
    let result = bin_service::validate_bin(&pool, &location, &bin_no).await?;
    Ok(Json(result))
}
