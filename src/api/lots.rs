use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::db::DbPool;
use crate::error::EngineResult;
use crate::models::transfer::AvailabilityView;
use crate::models::PendingAuditRow;
use crate::services::lot_service;

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    #[serde(rename = "itemKey")]
    pub item_key: String,
    pub location: String,
    #[serde(rename = "lotNo")]
    pub lot_no: String,
    #[serde(rename = "binNo")]
    pub bin_no: String,
}

/// `GET /api/lots/availability?itemKey&location&lotNo&binNo` — `searchAvailability`.
pub async fn get_availability_endpoint(
    State(pool): State<DbPool>,
    Query(params): Query<AvailabilityQuery>,
) -> EngineResult<Json<AvailabilityView>> {
    let view = lot_service::search_availability(
        &pool,
        &params.item_key,
        &params.location,
        &params.lot_no,
        &params.bin_no,
    )
    .await?;
    Ok(Json(view))
}

/// `GET /api/lots/:lotNo/:binNo/pending` — `listPendingForLotBin`.
pub async fn get_pending_for_lot_bin_endpoint(
    State(pool): State<DbPool>,
    Path((lot_no, bin_no)): Path<(String, String)>,
) -> EngineResult<Json<Vec<PendingAuditRow>>> {
    let rows = lot_service::list_pending_for_lot_bin(&pool, &lot_no, &bin_no).await?;
    Ok(Json(rows))
}
