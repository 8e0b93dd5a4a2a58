use tiberius::Query;

use crate::db::DbPool;
use crate::error::EngineResult;
use crate::models::bin::BinValidation;

/// `validateBin(location, bin)` (spec §6) — a read-only query surface
/// exposed so a caller can check a destination bin before calling
/// `transfer`/`transferCommitted`. Mirrors precondition check 2 of §4.2,
/// but reports the result instead of failing the request.
pub async fn validate_bin(pool: &DbPool, location: &str, bin_no: &str) -> EngineResult<BinValidation> {
    let trimmed = bin_no.trim();
    if trimmed.is_empty() {
        return Ok(BinValidation {
            is_valid: false,
            message: "bin number must not be empty".to_string(),
        });
    }

    let mut conn = pool.get().await?;
    let sql = "SELECT COUNT(*) AS Cnt FROM BINMaster WHERE Location = @P1 AND BinNo = @P2";
    let mut query = Query::new(sql);
    query.bind(location);
    query.bind(trimmed);

    let row = query.query(&mut *conn).await?.into_row().await?;
    let count: i32 = row.and_then(|r| r.get("Cnt")).unwrap_or(0);

    if count > 0 {
        Ok(BinValidation {
            is_valid: true,
            message: "bin is valid".to_string(),
        })
    } else {
        Ok(BinValidation {
            is_valid: false,
            message: format!("bin '{}' does not exist in location '{}'", trimmed, location),
        })
    }
}
