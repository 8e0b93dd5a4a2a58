use tiberius::Query;

use crate::db::DbPool;
use crate::error::EngineResult;
use crate::models::remark::RemarkOption;

/// `listRemarks()` (spec §4.6/§6) — a finite, fully materialized, restartable
/// read of the approved remark catalog. Read-only to the engine.
pub async fn list_remarks(pool: &DbPool) -> EngineResult<Vec<RemarkOption>> {
    let mut conn = pool.get().await?;
    let sql = r#"
        SELECT RemarkId, RemarkName, Active
        FROM cust_TransferRemark
        WHERE Active = 1
        ORDER BY RemarkId ASC
    "#;
    let rows = Query::new(sql)
        .query(&mut *conn)
        .await?
        .into_first_result()
        .await?;

    let remarks = rows
        .iter()
        .map(|row| RemarkOption {
            id: row.get("RemarkId").unwrap_or(0),
            name: row.get::<&str, _>("RemarkName").unwrap_or("").to_string(),
            active: row.get("Active").unwrap_or(false),
        })
        .collect();

    Ok(remarks)
}
