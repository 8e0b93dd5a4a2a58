use rust_decimal::Decimal;
use tiberius::Query;

use crate::db::{DbClient, DbPool};
use crate::error::{EngineError, EngineResult};
use crate::models::audit::AuditLeg;
use crate::models::lot::LotKey;
use crate::models::transfer::{CommittedTransferRequest, TransferResult};
use crate::services::availability;
use crate::services::preconditions::{self, GateInput};
use crate::services::receipt_service::{LotSnapshot, ReceiptMeta, TransferOutcome};
use crate::services::reconciliation::{LegSide, ReconciliationMode};
use crate::services::transfer_service::write_audit_leg;
use crate::services::{receipt_service, sequence_service};

pub struct TransferOutput {
    pub result: TransferResult,
    pub receipt: crate::models::transfer::TransferReceipt,
}

/// `transferCommitted(CommittedTransferRequest)` (spec §4.5) — re-homes
/// stock already reserved against pending outbound transactions on the
/// source bin, without touching `on_hand`.
pub async fn transfer_committed(
    pool: &DbPool,
    reconciliation: &dyn ReconciliationMode,
    request: &CommittedTransferRequest,
    lock_wait_ms: u64,
) -> EngineResult<TransferOutput> {
    let item_key = request.item_key.trim();
    let location = request.location.trim();
    let lot_no = request.lot_no.trim();
    let bin_from = request.bin_from.trim();
    let bin_to = request.bin_to.trim();
    let user_id = request.user_id.trim();
    let qty = request.transfer_qty.round_dp(3);

    if qty <= Decimal::ZERO || qty.scale() > 3 {
        return Err(EngineError::InsufficientCommitted {
            requested: request.transfer_qty,
            committed: Decimal::ZERO,
        });
    }

    let source_key = LotKey {
        item_key: item_key.to_string(),
        location_key: location.to_string(),
        lot_no: lot_no.to_string(),
        bin_no: bin_from.to_string(),
    };
    let dest_key = LotKey {
        item_key: item_key.to_string(),
        location_key: location.to_string(),
        lot_no: lot_no.to_string(),
        bin_no: bin_to.to_string(),
    };

    preconditions::gate(
        pool,
        &GateInput {
            item_key,
            location_key: location,
            lot_no,
            bin_from,
            bin_to,
        },
    )
    .await?;

    let mut conn = pool.get().await?;

    conn.simple_query(format!("SET LOCK_TIMEOUT {}", lock_wait_ms))
        .await
        .map_err(|e| EngineError::SystemError(format!("SET LOCK_TIMEOUT failed: {}", e)))?;

    conn.simple_query("BEGIN TRAN")
        .await
        .map_err(|e| EngineError::SystemError(format!("BEGIN TRAN failed: {}", e)))?;

    let outcome = run_committed_body(
        &mut conn,
        reconciliation,
        &source_key,
        &dest_key,
        qty,
        user_id,
        request.full_commit,
        &request.lot_tran_nos,
    )
    .await;

    let (doc_no, source_status, dest_status, source_lot) = match outcome {
        Ok(v) => v,
        Err(e) => {
            let _ = conn.simple_query("ROLLBACK").await;
            return Err(e);
        }
    };

    conn.simple_query("COMMIT")
        .await
        .map_err(|e| EngineError::SystemError(format!("COMMIT failed: {}", e)))?;

    tracing::warn!(
        document_no = %doc_no,
        item_key = %item_key,
        lot_no = %lot_no,
        bin_from = %bin_from,
        bin_to = %bin_to,
        qty = %qty,
        "committed-quantity transfer committed; original pending rows left unmarked for the batch job"
    );

    let timestamp = chrono::Utc::now();

    let receipt = receipt_service::project(
        &TransferOutcome {
            document_no: doc_no.clone(),
            transfer_qty: qty,
            source_lot_status: source_status,
            destination_lot_status: dest_status,
            timestamp,
        },
        &LotSnapshot {
            item_key: item_key.to_string(),
            location: location.to_string(),
            bin_from: bin_from.to_string(),
            bin_to: bin_to.to_string(),
            lot_no: lot_no.to_string(),
            on_hand: source_lot.on_hand(),
        },
        &ReceiptMeta {
            remark: request.remarks.clone().unwrap_or_default(),
            reference: request.referenced.clone(),
        },
    );

    let result = TransferResult {
        success: true,
        document_no: doc_no,
        message: "committed transfer executed".to_string(),
        timestamp,
        source_lot_status: source_status,
        destination_lot_status: dest_status,
        receipt: receipt.clone(),
    };

    Ok(TransferOutput { result, receipt })
}

#[allow(clippy::too_many_arguments)]
async fn run_committed_body(
    client: &mut DbClient,
    reconciliation: &dyn ReconciliationMode,
    source_key: &LotKey,
    dest_key: &LotKey,
    qty: Decimal,
    user_id: &str,
    full_commit: bool,
    lot_tran_nos: &[i32],
) -> EngineResult<(
    String,
    crate::models::lot::LotStatus,
    crate::models::lot::LotStatus,
    availability::AvailabilitySnapshot,
)> {
    // Step 2: locked re-read of the source row.
    let source_lot = availability::read_lot_for_update(client, source_key).await?;
    let pending = availability::pending_commit(client, source_key).await?;
    let snapshot = availability::snapshot_from(source_lot.clone(), pending)?;
    let committed = snapshot.committed_sales();

    if qty > committed && !availability::within_tolerance(qty, committed) {
        return Err(EngineError::InsufficientCommitted {
            requested: qty,
            committed,
        });
    }

    // Exact-match scenario consumes the whole commitment set and needs no
    // explicit subset; a partial scenario must be backed by a caller-supplied
    // subset of pending rows summing to `qty` within tolerance.
    let is_full = full_commit || availability::within_tolerance(qty, committed);
    if !is_full {
        verify_subset_selection(client, source_key, lot_tran_nos, qty).await?;
    }

    // Step 4: release the reservation being re-homed.
    release_committed_sales(client, source_key, qty).await?;

    let doc_no = sequence_service::next(client, "BT").await?;

    let dest_status = read_destination_status(client, dest_key)
        .await?
        .unwrap_or(source_lot.lot_status);

    // Step 5: paired audit rows, exactly as in the free-quantity path.
    let issue_leg = AuditLeg::Issue {
        lot_no: source_key.lot_no.clone(),
        item_key: source_key.item_key.clone(),
        location_key: source_key.location_key.clone(),
        bin_no: source_key.bin_no.clone(),
        date_received: source_lot.date_received,
        date_expiry: source_lot.date_expiry,
        issue_doc_no: doc_no.clone(),
        issue_doc_line_no: 1,
        qty_issued: qty,
        vendor_key: source_lot.vendor_key.clone(),
        vendor_lot_no: source_lot.vendor_lot_no.clone(),
        user_id: user_id.to_string(),
    };
    let receipt_leg = AuditLeg::Receipt {
        lot_no: dest_key.lot_no.clone(),
        item_key: dest_key.item_key.clone(),
        location_key: dest_key.location_key.clone(),
        bin_no: dest_key.bin_no.clone(),
        date_received: source_lot.date_received,
        date_expiry: source_lot.date_expiry,
        receipt_doc_no: doc_no.clone(),
        receipt_doc_line_no: 1,
        qty_received: qty,
        vendor_key: source_lot.vendor_key.clone(),
        vendor_lot_no: source_lot.vendor_lot_no.clone(),
        user_id: user_id.to_string(),
    };

    write_audit_leg(client, &issue_leg).await?;
    write_audit_leg(client, &receipt_leg).await?;

    reconciliation
        .reconcile(client, source_key, LegSide::Source, qty)
        .await?;
    reconciliation
        .reconcile(client, dest_key, LegSide::Destination, qty)
        .await?;

    Ok((doc_no, source_lot.lot_status, dest_status, snapshot))
}

/// Sums `qty_issued` for the caller-supplied `lot_tran_no` subset, all
/// required to belong to this lot/bin, and checks the sum matches `qty`
/// within tolerance. Empty subsets and mismatched sums both fail
/// `SelectionMismatch` (spec §4.5).
async fn verify_subset_selection(
    client: &mut DbClient,
    source_key: &LotKey,
    lot_tran_nos: &[i32],
    qty: Decimal,
) -> EngineResult<()> {
    if lot_tran_nos.is_empty() {
        return Err(EngineError::SelectionMismatch {
            requested: qty,
            selected: Decimal::ZERO,
        });
    }

    let placeholders = (1..=lot_tran_nos.len())
        .map(|i| format!("@P{}", i + 2))
        .collect::<Vec<_>>()
        .join(",");
    let sql = format!(
        r#"
        SELECT ISNULL(SUM(QtyIssued), 0) AS Selected, COUNT(*) AS Matched
        FROM LotTransaction
        WHERE LotNo = @P1 AND BinNo = @P2 AND Processed IN ('N', 'P')
          AND LotTranNo IN ({})
        "#,
        placeholders
    );

    let mut query = Query::new(sql);
    query.bind(source_key.lot_no.as_str());
    query.bind(source_key.bin_no.as_str());
    for id in lot_tran_nos {
        query.bind(*id);
    }

    let row = query
        .query(client)
        .await?
        .into_row()
        .await?
        .ok_or_else(|| EngineError::SystemError("subset selection query returned no row".into()))?;

    let selected: Decimal = row.get("Selected").unwrap_or_default();
    let matched: i32 = row.get("Matched").unwrap_or(0);

    if matched as usize != lot_tran_nos.len() || !availability::within_tolerance(selected, qty) {
        return Err(EngineError::SelectionMismatch {
            requested: qty,
            selected,
        });
    }
    Ok(())
}

async fn release_committed_sales(client: &mut DbClient, key: &LotKey, qty: Decimal) -> EngineResult<()> {
    let sql = r#"
        UPDATE LotMaster SET QtyCommitSales = QtyCommitSales - @P5
        WHERE LotNo = @P1 AND ItemKey = @P2 AND LocationKey = @P3 AND BinNo = @P4
    "#;
    let mut query = Query::new(sql);
    query.bind(key.lot_no.as_str());
    query.bind(key.item_key.as_str());
    query.bind(key.location_key.as_str());
    query.bind(key.bin_no.as_str());
    query.bind(qty);
    query.execute(client).await?;
    Ok(())
}

async fn read_destination_status(
    client: &mut DbClient,
    key: &LotKey,
) -> EngineResult<Option<crate::models::lot::LotStatus>> {
    let sql = r#"
        SELECT LotStatus FROM LotMaster
        WHERE LotNo = @P1 AND ItemKey = @P2 AND LocationKey = @P3 AND BinNo = @P4
    "#;
    let mut query = Query::new(sql);
    query.bind(key.lot_no.as_str());
    query.bind(key.item_key.as_str());
    query.bind(key.location_key.as_str());
    query.bind(key.bin_no.as_str());

    let row = query.query(client).await?.into_row().await?;
    Ok(row.map(|r| {
        let status: &str = r.get("LotStatus").unwrap_or(" ");
        crate::models::lot::LotStatus::from(status)
    }))
}
