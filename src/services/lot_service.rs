use tiberius::Query;

use crate::db::DbPool;
use crate::error::EngineResult;
use crate::models::audit::{is_pending_outbound, PendingAuditRow};
use crate::models::lot::LotKey;
use crate::models::transfer::AvailabilityView;
use crate::services::availability;

/// `searchAvailability(item, location, lot, bin)` (spec §6) — a plain,
/// unlocked read for callers deciding what to request before calling
/// `transfer`/`transferCommitted`.
pub async fn search_availability(
    pool: &DbPool,
    item_key: &str,
    location_key: &str,
    lot_no: &str,
    bin_no: &str,
) -> EngineResult<AvailabilityView> {
    let key = LotKey {
        item_key: item_key.to_string(),
        location_key: location_key.to_string(),
        lot_no: lot_no.to_string(),
        bin_no: bin_no.to_string(),
    };

    let lot = availability::read_lot(pool, &key).await?;

    let mut conn = pool.get().await?;
    let pending = availability::pending_commit(&mut *conn, &key).await?;

    Ok(AvailabilityView {
        item_key: lot.item_key.clone(),
        location: lot.location_key.clone(),
        lot_no: lot.lot_no.clone(),
        bin_no: lot.bin_no.clone(),
        on_hand: lot.on_hand,
        committed_sales: lot.committed_sales,
        available: lot.available(),
        pending_commit: pending,
    })
}

/// `listPendingForLotBin(lot, bin)` (spec §6) — the pending audit rows a
/// caller may select a subset from for the committed-quantity path
/// (spec §4.5).
pub async fn list_pending_for_lot_bin(
    pool: &DbPool,
    lot_no: &str,
    bin_no: &str,
) -> EngineResult<Vec<PendingAuditRow>> {
    let mut conn = pool.get().await?;
    let sql = r#"
        SELECT LotTranNo, LotNo, BinNo, IssueDocNo, IssueDocLineNo, QtyIssued, TransactionType
        FROM LotTransaction
        WHERE LotNo = @P1 AND BinNo = @P2 AND Processed IN ('N', 'P')
        ORDER BY LotTranNo ASC
    "#;
    let mut query = Query::new(sql);
    query.bind(lot_no);
    query.bind(bin_no);

    let rows = query.query(&mut *conn).await?.into_first_result().await?;

    let pending = rows
        .iter()
        .map(|row| {
            let transaction_type: i32 = row.get("TransactionType").unwrap_or(0);
            let lot_tran_no: i32 = row.get("LotTranNo").unwrap_or(0);
            let lot_no: &str = row.get("LotNo").unwrap_or("");
            let bin_no: &str = row.get("BinNo").unwrap_or("");
            let doc_no: &str = row.get("IssueDocNo").unwrap_or("");
            let line_no: i16 = row.get("IssueDocLineNo").unwrap_or(0);
            let qty = row.get("QtyIssued").unwrap_or_default();

            PendingAuditRow {
                lot_tran_no,
                lot_no: lot_no.to_string(),
                bin_no: bin_no.to_string(),
                doc_no: doc_no.to_string(),
                line_no,
                qty,
                type_name: transaction_type_name(transaction_type),
                transaction_type,
            }
        })
        .filter(|row| is_pending_outbound(row.transaction_type))
        .collect();

    Ok(pending)
}

fn transaction_type_name(transaction_type: i32) -> String {
    match transaction_type {
        8 => "Positive adjustment".to_string(),
        9 => "Negative adjustment".to_string(),
        other => format!("Type {}", other),
    }
}
