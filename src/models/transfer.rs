use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::lot::LotStatus;

/// Wire contract — `TransferRequest` (spec §6), the free-quantity path input.
#[derive(Debug, Clone, Deserialize)]
pub struct TransferRequest {
    #[serde(rename = "lotNo")]
    pub lot_no: String,

    #[serde(rename = "itemKey")]
    pub item_key: String,

    pub location: String,

    #[serde(rename = "binFrom")]
    pub bin_from: String,

    #[serde(rename = "binTo")]
    pub bin_to: String,

    #[serde(rename = "transferQty")]
    pub transfer_qty: Decimal,

    #[serde(rename = "userId")]
    pub user_id: String,

    #[serde(default)]
    pub remarks: Option<String>,

    #[serde(default)]
    pub referenced: Option<String>,
}

/// Wire contract — `CommittedTransferRequest` (spec §4.5/§6).
///
/// Either `full_commit` is set (consume the entire `committed_sales` set),
/// or `lot_tran_nos` carries the explicit subset of pending rows whose
/// `qty_issued` must sum to `transfer_qty` within the `10⁻³` tolerance.
#[derive(Debug, Clone, Deserialize)]
pub struct CommittedTransferRequest {
    #[serde(rename = "lotNo")]
    pub lot_no: String,

    #[serde(rename = "itemKey")]
    pub item_key: String,

    pub location: String,

    #[serde(rename = "binFrom")]
    pub bin_from: String,

    #[serde(rename = "binTo")]
    pub bin_to: String,

    #[serde(rename = "transferQty")]
    pub transfer_qty: Decimal,

    #[serde(rename = "userId")]
    pub user_id: String,

    #[serde(default)]
    pub remarks: Option<String>,

    #[serde(default)]
    pub referenced: Option<String>,

    #[serde(rename = "fullCommit", default)]
    pub full_commit: bool,

    #[serde(rename = "lotTranNos", default)]
    pub lot_tran_nos: Vec<i32>,
}

/// Wire contract — `TransferResult` (spec §6), the success envelope.
#[derive(Debug, Clone, Serialize)]
pub struct TransferResult {
    pub success: bool,

    #[serde(rename = "documentNo")]
    pub document_no: String,

    pub message: String,

    pub timestamp: DateTime<Utc>,

    #[serde(rename = "sourceLotStatus")]
    pub source_lot_status: LotStatus,

    #[serde(rename = "destinationLotStatus")]
    pub destination_lot_status: LotStatus,

    pub receipt: TransferReceipt,
}

/// A single pending audit row identifier supplied in a committed-path
/// subset selection.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LotTranRef {
    #[serde(rename = "lotTranNo")]
    pub lot_tran_no: i32,
}

/// `searchAvailability` response (spec §4.1/§6).
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityView {
    #[serde(rename = "itemKey")]
    pub item_key: String,

    pub location: String,

    #[serde(rename = "lotNo")]
    pub lot_no: String,

    #[serde(rename = "binNo")]
    pub bin_no: String,

    #[serde(rename = "onHand")]
    pub on_hand: Decimal,

    #[serde(rename = "committedSales")]
    pub committed_sales: Decimal,

    pub available: Decimal,

    #[serde(rename = "pendingCommit")]
    pub pending_commit: Decimal,
}

/// `Receipt Projector` output (spec §4.7).
#[derive(Debug, Clone, Serialize)]
pub struct TransferReceipt {
    #[serde(rename = "documentNo")]
    pub document_no: String,

    #[serde(rename = "itemKey")]
    pub item_key: String,

    pub location: String,

    #[serde(rename = "binFrom")]
    pub bin_from: String,

    #[serde(rename = "binTo")]
    pub bin_to: String,

    #[serde(rename = "lotNo")]
    pub lot_no: String,

    #[serde(rename = "onHand")]
    pub on_hand: Decimal,

    #[serde(rename = "transferQty")]
    pub transfer_qty: Decimal,

    #[serde(rename = "lotStatus")]
    pub lot_status: String,

    /// `DD-MM-YY`, per spec §4.7.
    pub date: String,

    pub remark: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}
