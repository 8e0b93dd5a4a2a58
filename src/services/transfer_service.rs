use rust_decimal::Decimal;
use tiberius::Query;

use crate::db::{DbClient, DbPool};
use crate::error::{EngineError, EngineResult};
use crate::models::audit::AuditLeg;
use crate::models::lot::LotKey;
use crate::models::transfer::{TransferRequest, TransferResult};
use crate::services::availability;
use crate::services::preconditions::{self, GateInput};
use crate::services::receipt_service::{LotSnapshot, ReceiptMeta, TransferOutcome};
use crate::services::reconciliation::{LegSide, ReconciliationMode};
use crate::services::{receipt_service, sequence_service};

/// Result of a committed free-quantity transfer, bundling the wire-contract
/// `TransferResult` with the inputs the Receipt Projector needs.
pub struct TransferOutput {
    pub result: TransferResult,
    pub receipt: crate::models::transfer::TransferReceipt,
}

fn non_positive_or_overprecise(qty: Decimal) -> bool {
    qty <= Decimal::ZERO || qty.scale() > 3
}

/// `transfer(TransferRequest)` (spec §4.4) — the free-quantity path.
///
/// Every step after the gate runs on one connection inside one
/// `BEGIN TRAN`/`COMMIT`, mirroring the donor's own phased pick transaction:
/// any failure rolls back everything written so far, including the document
/// counter bump.
pub async fn transfer(
    pool: &DbPool,
    reconciliation: &dyn ReconciliationMode,
    request: &TransferRequest,
    lock_wait_ms: u64,
) -> EngineResult<TransferOutput> {
    let item_key = request.item_key.trim();
    let location = request.location.trim();
    let lot_no = request.lot_no.trim();
    let bin_from = request.bin_from.trim();
    let bin_to = request.bin_to.trim();
    let user_id = request.user_id.trim();
    let qty = request.transfer_qty.round_dp(3);

    if non_positive_or_overprecise(request.transfer_qty) {
        return Err(EngineError::InsufficientQuantity {
            requested: request.transfer_qty,
            available: Decimal::ZERO,
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

    // Step 1: gate preconditions on a plain pooled connection.
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

    let outcome = run_transfer_body(&mut conn, reconciliation, &source_key, &dest_key, qty, user_id).await;

    let (doc_no, source_status, dest_status, source_snapshot) = match outcome {
        Ok(v) => v,
        Err(e) => {
            let _ = conn.simple_query("ROLLBACK").await;
            return Err(e);
        }
    };

    conn.simple_query("COMMIT")
        .await
        .map_err(|e| EngineError::SystemError(format!("COMMIT failed: {}", e)))?;

    tracing::info!(
        document_no = %doc_no,
        item_key = %item_key,
        lot_no = %lot_no,
        bin_from = %bin_from,
        bin_to = %bin_to,
        qty = %qty,
        user_id = %user_id,
        "free-quantity transfer committed"
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
            on_hand: source_snapshot.on_hand(),
        },
        &ReceiptMeta {
            remark: request.remarks.clone().unwrap_or_default(),
            reference: request.referenced.clone(),
        },
    );

    let result = TransferResult {
        success: true,
        document_no: doc_no,
        message: "transfer committed".to_string(),
        timestamp,
        source_lot_status: source_status,
        destination_lot_status: dest_status,
        receipt: receipt.clone(),
    };

    Ok(TransferOutput { result, receipt })
}

/// Steps 2–8 of §4.4, executed on the caller's open transaction. Returns the
/// allocated document number and the source/destination lot statuses.
async fn run_transfer_body(
    client: &mut DbClient,
    reconciliation: &dyn ReconciliationMode,
    source_key: &LotKey,
    dest_key: &LotKey,
    qty: Decimal,
    user_id: &str,
) -> EngineResult<(
    String,
    crate::models::lot::LotStatus,
    crate::models::lot::LotStatus,
    availability::AvailabilitySnapshot,
)> {
    // Step 2: locked re-read + availability.
    let source_lot = availability::read_lot_for_update(client, source_key).await?;
    let pending = availability::pending_commit(client, source_key).await?;
    let snapshot = availability::snapshot_from(source_lot.clone(), pending)?;

    // Step 3: sufficiency check, tolerance 10^-3.
    if qty > snapshot.available() && !availability::within_tolerance(qty, snapshot.available()) {
        return Err(EngineError::InsufficientQuantity {
            requested: qty,
            available: snapshot.available(),
        });
    }

    // Step 4: allocate document number, late, inside the transaction.
    let doc_no = sequence_service::next(client, "BT").await?;

    // Step 5: bump source commitment.
    bump_committed_sales(client, source_key, qty).await?;

    // Step 6: destination row existence is only consulted for status
    // fallback; the engine never creates it (spec §9.1 resolution 1).
    let dest_status = read_destination_status(client, dest_key)
        .await?
        .unwrap_or(source_lot.lot_status);

    // Steps 7–8: paired audit rows.
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

async fn bump_committed_sales(client: &mut DbClient, key: &LotKey, qty: Decimal) -> EngineResult<()> {
    let sql = r#"
        UPDATE LotMaster SET QtyCommitSales = QtyCommitSales + @P5
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

/// Writes one leg of a paired transfer movement (spec §9 "polymorphism over
/// audit writes"). Shared between the free-quantity and committed-quantity
/// coordinators — the only place that knows the `LotTransaction` column
/// layout for either leg shape.
pub(crate) async fn write_audit_leg(client: &mut DbClient, leg: &AuditLeg) -> EngineResult<()> {
    match leg {
        AuditLeg::Issue {
            lot_no,
            item_key,
            location_key,
            bin_no,
            date_received,
            date_expiry,
            issue_doc_no,
            issue_doc_line_no,
            qty_issued,
            vendor_key,
            vendor_lot_no,
            user_id,
        } => {
            let sql = r#"
                INSERT INTO LotTransaction (
                    LotNo, ItemKey, LocationKey, BinNo, DateReceived, DateExpiry, TransactionType,
                    IssueDocNo, IssueDocLineNo, QtyIssued, ReceiptDocNo, ReceiptDocLineNo, QtyReceived,
                    Vendorkey, VendorlotNo, CustomerKey, RecUserid, RecDate, Processed, DateQuarantine
                ) VALUES (
                    @P1, @P2, @P3, @P4, @P5, @P6, 9,
                    @P7, @P8, @P9, '', 0, 0,
                    @P10, @P11, '', @P12, GETDATE(), 'N', NULL
                )
            "#;
            let mut query = Query::new(sql);
            query.bind(lot_no.as_str());
            query.bind(item_key.as_str());
            query.bind(location_key.as_str());
            query.bind(bin_no.as_str());
            query.bind(*date_received);
            query.bind(*date_expiry);
            query.bind(issue_doc_no.as_str());
            query.bind(*issue_doc_line_no);
            query.bind(*qty_issued);
            query.bind(vendor_key.as_str());
            query.bind(vendor_lot_no.as_str());
            query.bind(user_id.as_str());
            query.execute(client).await?;
        }
        AuditLeg::Receipt {
            lot_no,
            item_key,
            location_key,
            bin_no,
            date_received,
            date_expiry,
            receipt_doc_no,
            receipt_doc_line_no,
            qty_received,
            vendor_key,
            vendor_lot_no,
            user_id,
        } => {
            let sql = r#"
                INSERT INTO LotTransaction (
                    LotNo, ItemKey, LocationKey, BinNo, DateReceived, DateExpiry, TransactionType,
                    IssueDocNo, IssueDocLineNo, QtyIssued, ReceiptDocNo, ReceiptDocLineNo, QtyReceived,
                    Vendorkey, VendorlotNo, CustomerKey, RecUserid, RecDate, Processed, DateQuarantine
                ) VALUES (
                    @P1, @P2, @P3, @P4, @P5, @P6, 8,
                    '', 0, 0, @P7, @P8, @P9,
                    @P10, @P11, '', @P12, GETDATE(), 'N', NULL
                )
            "#;
            let mut query = Query::new(sql);
            query.bind(lot_no.as_str());
            query.bind(item_key.as_str());
            query.bind(location_key.as_str());
            query.bind(bin_no.as_str());
            query.bind(*date_received);
            query.bind(*date_expiry);
            query.bind(receipt_doc_no.as_str());
            query.bind(*receipt_doc_line_no);
            query.bind(*qty_received);
            query.bind(vendor_key.as_str());
            query.bind(vendor_lot_no.as_str());
            query.bind(user_id.as_str());
            query.execute(client).await?;
        }
    }
    Ok(())
}
