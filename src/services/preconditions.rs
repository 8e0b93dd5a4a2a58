use tiberius::Query;

use crate::db::DbPool;
use crate::error::{EngineError, EngineResult};

/// Input shared by every precondition check (spec §4.2).
#[derive(Debug, Clone)]
pub struct GateInput<'a> {
    pub item_key: &'a str,
    pub location_key: &'a str,
    pub lot_no: &'a str,
    pub bin_from: &'a str,
    pub bin_to: &'a str,
}

/// Runs the six ordered precondition checks, short-circuiting on the first
/// failure. Each check is an independent async function so a failure
/// attributes to exactly the check that produced it, and the order here is
/// visibly the order in the spec — not a single monolithic query.
pub async fn gate(pool: &DbPool, input: &GateInput<'_>) -> EngineResult<()> {
    check_bins_differ(input.bin_from, input.bin_to)?;
    check_bin_exists(pool, input.location_key, input.bin_to).await?;
    check_inventory_not_frozen(pool).await?;
    check_no_physical_count_in_progress(pool, input.item_key, input.location_key).await?;
    check_item_transferrable(pool, input.item_key).await?;
    check_source_lot_exists(
        pool,
        input.item_key,
        input.location_key,
        input.lot_no,
        input.bin_from,
    )
    .await?;
    Ok(())
}

/// 1. Destination bin is non-empty, trimmed, and different from source bin.
///
/// Exposed (rather than private) because it is the one precondition check
/// that needs no database round trip — callers validating a form field
/// before submitting a transfer can call it directly, and it is the only
/// check in this module testable without a live connection.
pub fn check_bins_differ(bin_from: &str, bin_to: &str) -> EngineResult<()> {
    let trimmed_to = bin_to.trim();
    if trimmed_to.is_empty() {
        return Err(EngineError::InvalidBin {
            bin_no: bin_to.to_string(),
            message: "destination bin must not be empty".to_string(),
        });
    }
    if trimmed_to.eq_ignore_ascii_case(bin_from.trim()) {
        return Err(EngineError::InvalidBin {
            bin_no: bin_to.to_string(),
            message: "destination bin must differ from source bin".to_string(),
        });
    }
    Ok(())
}

/// 2. Destination bin exists in `location` per bin master.
async fn check_bin_exists(pool: &DbPool, location: &str, bin_no: &str) -> EngineResult<()> {
    let mut conn = pool.get().await?;
    let sql = "SELECT COUNT(*) AS Cnt FROM BINMaster WHERE Location = @P1 AND BinNo = @P2";
    let mut query = Query::new(sql);
    query.bind(location);
    query.bind(bin_no.trim());

    let row = query
        .query(&mut *conn)
        .await?
        .into_row()
        .await?
        .ok_or_else(|| EngineError::SystemError("bin existence query returned no row".into()))?;
    let count: i32 = row.get("Cnt").unwrap_or(0);

    if count == 0 {
        return Err(EngineError::InvalidBin {
            bin_no: bin_no.to_string(),
            message: format!("bin '{}' does not exist in location '{}'", bin_no, location),
        });
    }
    Ok(())
}

/// 3. `Freeze_Inventory` flag in the parameter store is not truthy.
async fn check_inventory_not_frozen(pool: &DbPool) -> EngineResult<()> {
    let mut conn = pool.get().await?;
    let sql = "SELECT ParamValue FROM SysParam WHERE ParamName = 'Freeze_Inventory'";
    let mut query = Query::new(sql);

    let row = query.query(&mut *conn).await?.into_row().await?;
    let frozen = row
        .and_then(|r| r.get::<&str, _>("ParamValue").map(str::to_string))
        .map(|v| matches!(v.trim(), "1" | "Y" | "y" | "true" | "TRUE"))
        .unwrap_or(false);

    if frozen {
        return Err(EngineError::InventoryFrozen);
    }
    Ok(())
}

/// 4. No physical count in progress for `(item, location)`.
async fn check_no_physical_count_in_progress(
    pool: &DbPool,
    item_key: &str,
    location_key: &str,
) -> EngineResult<()> {
    let mut conn = pool.get().await?;
    let sql = r#"
        SELECT COUNT(*) AS Cnt FROM PhysicalCountHeader
        WHERE ItemKey = @P1 AND LocationKey = @P2 AND Status = 'OPEN'
    "#;
    let mut query = Query::new(sql);
    query.bind(item_key);
    query.bind(location_key);

    let row = query
        .query(&mut *conn)
        .await?
        .into_row()
        .await?
        .ok_or_else(|| EngineError::SystemError("physical count query returned no row".into()))?;
    let count: i32 = row.get("Cnt").unwrap_or(0);

    if count > 0 {
        return Err(EngineError::PhysicalCountInProgress {
            item_key: item_key.to_string(),
            location_key: location_key.to_string(),
        });
    }
    Ok(())
}

/// 5. The item is serial-lot-tracked and multi-bin-enabled.
async fn check_item_transferrable(pool: &DbPool, item_key: &str) -> EngineResult<()> {
    let mut conn = pool.get().await?;
    let sql = r#"
        SELECT LotTrackingBit, MultiBinBit FROM INMAST WHERE ItemKey = @P1
    "#;
    let mut query = Query::new(sql);
    query.bind(item_key);

    let row = query
        .query(&mut *conn)
        .await?
        .into_row()
        .await?
        .ok_or_else(|| EngineError::NotTransferrable {
            item_key: item_key.to_string(),
        })?;

    let lot_tracking: bool = row.get("LotTrackingBit").unwrap_or(false);
    let multi_bin: bool = row.get("MultiBinBit").unwrap_or(false);

    if !lot_tracking || !multi_bin {
        return Err(EngineError::NotTransferrable {
            item_key: item_key.to_string(),
        });
    }
    Ok(())
}

/// 6. The lot row at the source bin exists.
async fn check_source_lot_exists(
    pool: &DbPool,
    item_key: &str,
    location_key: &str,
    lot_no: &str,
    bin_from: &str,
) -> EngineResult<()> {
    let mut conn = pool.get().await?;
    let sql = r#"
        SELECT COUNT(*) AS Cnt FROM LotMaster
        WHERE LotNo = @P1 AND ItemKey = @P2 AND LocationKey = @P3 AND BinNo = @P4
    "#;
    let mut query = Query::new(sql);
    query.bind(lot_no);
    query.bind(item_key);
    query.bind(location_key);
    query.bind(bin_from);

    let row = query
        .query(&mut *conn)
        .await?
        .into_row()
        .await?
        .ok_or_else(|| EngineError::SystemError("lot existence query returned no row".into()))?;
    let count: i32 = row.get("Cnt").unwrap_or(0);

    if count == 0 {
        return Err(EngineError::LotNotFound {
            item_key: item_key.to_string(),
            location_key: location_key.to_string(),
            lot_no: lot_no.to_string(),
            bin_no: bin_from.to_string(),
        });
    }
    Ok(())
}
