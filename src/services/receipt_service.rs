use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::lot::LotStatus;
use crate::models::transfer::TransferReceipt;

/// Outcome of a successfully committed transfer — the inputs the Receipt
/// Projector needs that only exist after the transaction commits.
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    pub document_no: String,
    pub transfer_qty: Decimal,
    pub source_lot_status: LotStatus,
    pub destination_lot_status: LotStatus,
    pub timestamp: DateTime<Utc>,
}

/// The resolved lot data the receipt echoes (pre-transfer `on_hand`, the
/// bins and lot identity involved).
#[derive(Debug, Clone)]
pub struct LotSnapshot {
    pub item_key: String,
    pub location: String,
    pub bin_from: String,
    pub bin_to: String,
    pub lot_no: String,
    pub on_hand: Decimal,
}

/// Caller-supplied annotation fields that are echoed verbatim.
#[derive(Debug, Clone, Default)]
pub struct ReceiptMeta {
    pub remark: String,
    pub reference: Option<String>,
}

/// Receipt Projector (spec §4.7) — pure, side-effect-free, no `DbPool`, so
/// trivially unit-testable without a database.
pub fn project(outcome: &TransferOutcome, lot: &LotSnapshot, meta: &ReceiptMeta) -> TransferReceipt {
    let lot_status = if outcome.source_lot_status == outcome.destination_lot_status {
        outcome.source_lot_status.to_string()
    } else {
        format!(
            "{} - {}",
            outcome.source_lot_status, outcome.destination_lot_status
        )
    };

    TransferReceipt {
        document_no: outcome.document_no.clone(),
        item_key: lot.item_key.clone(),
        location: lot.location.clone(),
        bin_from: lot.bin_from.clone(),
        bin_to: lot.bin_to.clone(),
        lot_no: lot.lot_no.clone(),
        on_hand: lot.on_hand,
        transfer_qty: outcome.transfer_qty.round_dp(3),
        lot_status,
        date: outcome.timestamp.format("%d-%m-%y").to_string(),
        remark: meta.remark.clone(),
        reference: meta.reference.clone(),
    }
}
