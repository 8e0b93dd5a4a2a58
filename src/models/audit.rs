use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Negative-adjustment transaction type written on the source leg of a transfer.
pub const TXN_TYPE_ISSUE: i32 = 9;
/// Positive-adjustment transaction type written on the destination leg of a transfer.
pub const TXN_TYPE_RECEIPT: i32 = 8;

/// Transaction types the availability calculator and `listPendingForLotBin`
/// treat as "pending outbound" when summing commitment from audit rows.
pub const PENDING_OUTBOUND_TYPES: [i32; 11] = [2, 3, 5, 7, 9, 10, 12, 16, 17, 20, 21];

pub fn is_pending_outbound(transaction_type: i32) -> bool {
    PENDING_OUTBOUND_TYPES.contains(&transaction_type)
}

/// `processed` flag carried on every audit row. Engine always writes `N`;
/// `P`/`Y` only ever appear on rows the batch job has already touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessedStatus {
    N,
    P,
    Y,
}

impl ProcessedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessedStatus::N => "N",
            ProcessedStatus::P => "P",
            ProcessedStatus::Y => "Y",
        }
    }

    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim() {
            "Y" => ProcessedStatus::Y,
            "P" => ProcessedStatus::P,
            _ => ProcessedStatus::N,
        }
    }
}

/// One leg of a paired transfer movement written into `LotTransaction`.
///
/// The two legs populate disjoint column sets (issue_doc vs. receipt_doc,
/// qty_issued vs. qty_received) — a tagged variant with a single `write`
/// function models that directly instead of an inheritance hierarchy.
#[derive(Debug, Clone)]
pub enum AuditLeg {
    /// Source-bin leg: `transaction_type = 9`.
    Issue {
        lot_no: String,
        item_key: String,
        location_key: String,
        bin_no: String,
        date_received: Option<NaiveDateTime>,
        date_expiry: Option<NaiveDateTime>,
        issue_doc_no: String,
        issue_doc_line_no: i16,
        qty_issued: Decimal,
        vendor_key: String,
        vendor_lot_no: String,
        user_id: String,
    },
    /// Destination-bin leg: `transaction_type = 8`.
    Receipt {
        lot_no: String,
        item_key: String,
        location_key: String,
        bin_no: String,
        date_received: Option<NaiveDateTime>,
        date_expiry: Option<NaiveDateTime>,
        receipt_doc_no: String,
        receipt_doc_line_no: i16,
        qty_received: Decimal,
        vendor_key: String,
        vendor_lot_no: String,
        user_id: String,
    },
}

impl AuditLeg {
    pub fn transaction_type(&self) -> i32 {
        match self {
            AuditLeg::Issue { .. } => TXN_TYPE_ISSUE,
            AuditLeg::Receipt { .. } => TXN_TYPE_RECEIPT,
        }
    }

    pub fn bin_no(&self) -> &str {
        match self {
            AuditLeg::Issue { bin_no, .. } => bin_no,
            AuditLeg::Receipt { bin_no, .. } => bin_no,
        }
    }

    pub fn qty(&self) -> Decimal {
        match self {
            AuditLeg::Issue { qty_issued, .. } => *qty_issued,
            AuditLeg::Receipt { qty_received, .. } => *qty_received,
        }
    }
}

/// A pending (not yet batch-processed) audit row read back for
/// `listPendingForLotBin` and for the committed-path subset selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingAuditRow {
    #[serde(rename = "lotTranNo")]
    pub lot_tran_no: i32,

    #[serde(rename = "lotNo")]
    pub lot_no: String,

    #[serde(rename = "binNo")]
    pub bin_no: String,

    #[serde(rename = "docNo")]
    pub doc_no: String,

    #[serde(rename = "lineNo")]
    pub line_no: i16,

    pub qty: Decimal,

    #[serde(rename = "typeName")]
    pub type_name: String,

    #[serde(skip)]
    pub transaction_type: i32,
}
