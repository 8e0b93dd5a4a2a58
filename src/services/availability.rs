use rust_decimal::Decimal;
use tiberius::{Query, Row};

use crate::db::{DbClient, DbPool};
use crate::error::{EngineError, EngineResult};
use crate::models::audit::PENDING_OUTBOUND_TYPES;
use crate::models::lot::{LotKey, LotRow, LotStatus};

/// Output of the Availability Calculator (spec §4.1).
#[derive(Debug, Clone)]
pub struct AvailabilitySnapshot {
    pub lot: LotRow,
    pub pending_commit: Decimal,
}

impl AvailabilitySnapshot {
    pub fn on_hand(&self) -> Decimal {
        self.lot.on_hand
    }

    pub fn committed_sales(&self) -> Decimal {
        self.lot.committed_sales
    }

    pub fn available(&self) -> Decimal {
        self.lot.available()
    }
}

fn row_to_lot(row: &Row, key: &LotKey) -> LotRow {
    let vendor_key: &str = row.get("VendorKey").unwrap_or("");
    let vendor_lot_no: &str = row.get("VendorLotNo").unwrap_or("");
    let date_received = row
        .try_get::<chrono::NaiveDateTime, _>("DateReceived")
        .ok()
        .flatten();
    let date_expiry = row
        .try_get::<chrono::NaiveDateTime, _>("DateExpiry")
        .ok()
        .flatten();
    let lot_status: &str = row.get("LotStatus").unwrap_or(" ");
    let on_hand: Decimal = row.get("QtyOnHand").unwrap_or_default();
    let committed_sales: Decimal = row.get("QtyCommitSales").unwrap_or_default();
    let reserved: Decimal = row.get("QtyReserved").unwrap_or_default();

    LotRow {
        lot_no: key.lot_no.clone(),
        item_key: key.item_key.clone(),
        location_key: key.location_key.clone(),
        bin_no: key.bin_no.clone(),
        vendor_key: vendor_key.to_string(),
        vendor_lot_no: vendor_lot_no.to_string(),
        date_received,
        date_expiry,
        lot_status: LotStatus::from(lot_status),
        on_hand,
        committed_sales,
        reserved,
    }
}

/// Plain, unlocked read of a lot row — used by `searchAvailability`.
pub async fn read_lot(pool: &DbPool, key: &LotKey) -> EngineResult<LotRow> {
    let mut conn = pool.get().await?;
    read_lot_with_client(&mut *conn, key, false).await
}

/// Locked read under `UPDLOCK, ROWLOCK`, for use exclusively inside a
/// transfer's own open transaction (spec §4.1 implementation note).
pub async fn read_lot_for_update(client: &mut DbClient, key: &LotKey) -> EngineResult<LotRow> {
    read_lot_with_client(client, key, true).await
}

async fn read_lot_with_client(client: &mut DbClient, key: &LotKey, locked: bool) -> EngineResult<LotRow> {
    let lock_hint = if locked { "WITH (UPDLOCK, ROWLOCK)" } else { "" };
    let sql = format!(
        r#"
        SELECT VendorKey, VendorLotNo, DateReceived, DateExpiry, LotStatus,
               QtyOnHand, QtyCommitSales, QtyReserved
        FROM LotMaster {}
        WHERE LotNo = @P1 AND ItemKey = @P2 AND LocationKey = @P3 AND BinNo = @P4
        "#,
        lock_hint
    );

    let mut query = Query::new(sql);
    query.bind(key.lot_no.as_str());
    query.bind(key.item_key.as_str());
    query.bind(key.location_key.as_str());
    query.bind(key.bin_no.as_str());

    let row = query
        .query(client)
        .await?
        .into_row()
        .await?
        .ok_or_else(|| EngineError::LotNotFound {
            item_key: key.item_key.clone(),
            location_key: key.location_key.clone(),
            lot_no: key.lot_no.clone(),
            bin_no: key.bin_no.clone(),
        })?;

    Ok(row_to_lot(&row, key))
}

/// Sum of `qty_issued`/`qty_received` on active (`processed IN ('N','P')`)
/// `LotTransaction` and `QcLotTransaction` rows restricted to the outbound
/// transaction types, for the same key (spec §4.1).
pub async fn pending_commit(client: &mut DbClient, key: &LotKey) -> EngineResult<Decimal> {
    let types_list = PENDING_OUTBOUND_TYPES
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(",");

    let sql = format!(
        r#"
        SELECT ISNULL(SUM(QtyIssued), 0) AS PendingQty
        FROM LotTransaction
        WHERE LotNo = @P1 AND ItemKey = @P2 AND LocationKey = @P3 AND BinNo = @P4
          AND Processed IN ('N', 'P')
          AND TransactionType IN ({})
        "#,
        types_list
    );
    let qc_sql = format!(
        r#"
        SELECT ISNULL(SUM(QtyIssued), 0) AS PendingQty
        FROM QcLotTransaction
        WHERE LotNo = @P1 AND ItemKey = @P2 AND LocationKey = @P3 AND BinNo = @P4
          AND Processed IN ('N', 'P')
          AND TransactionType IN ({})
        "#,
        types_list
    );

    let mut audit_sum = Decimal::ZERO;
    for text in [sql.as_str(), qc_sql.as_str()] {
        let mut query = Query::new(text);
        query.bind(key.lot_no.as_str());
        query.bind(key.item_key.as_str());
        query.bind(key.location_key.as_str());
        query.bind(key.bin_no.as_str());

        let row = query
            .query(&mut *client)
            .await?
            .into_row()
            .await?
            .ok_or_else(|| EngineError::SystemError("pending commit query returned no row".into()))?;
        let part: Decimal = row.get("PendingQty").unwrap_or_default();
        audit_sum += part;
    }

    Ok(audit_sum)
}

/// Full availability snapshot: lot row plus recomputed pending commitment
/// (spec §4.1 output). Callers in a write path must pass a client already
/// holding the `UPDLOCK` read; read-only callers pass the plain read.
pub fn snapshot_from(lot: LotRow, pending_commit: Decimal) -> EngineResult<AvailabilitySnapshot> {
    if lot.available() < Decimal::ZERO {
        return Err(EngineError::InvariantViolation(format!(
            "available quantity is negative for lot {} item {} bin {}: on_hand={} committed_sales={}",
            lot.lot_no, lot.item_key, lot.bin_no, lot.on_hand, lot.committed_sales
        )));
    }
    Ok(AvailabilitySnapshot {
        lot,
        pending_commit,
    })
}

/// Tolerance used everywhere two quantities are compared for "equality"
/// (spec §4.4.3, §4.5, §8): absolute differences below `10⁻³`.
pub fn within_tolerance(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() < Decimal::new(1, 3)
}
