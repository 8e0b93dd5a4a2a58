use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lot row entity — one inventory lot in one bin.
/// Database table: LotMaster
/// Composite PK: (LotNo, ItemKey, LocationKey, BinNo)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotRow {
    #[serde(rename = "LotNo")]
    pub lot_no: String,

    #[serde(rename = "ItemKey")]
    pub item_key: String,

    #[serde(rename = "LocationKey")]
    pub location_key: String,

    #[serde(rename = "BinNo")]
    pub bin_no: String,

    #[serde(rename = "VendorKey")]
    pub vendor_key: String,

    #[serde(rename = "VendorLotNo")]
    pub vendor_lot_no: String,

    #[serde(rename = "DateReceived")]
    pub date_received: Option<NaiveDateTime>,

    #[serde(rename = "DateExpiry")]
    pub date_expiry: Option<NaiveDateTime>,

    #[serde(rename = "LotStatus")]
    pub lot_status: LotStatus,

    #[serde(rename = "QtyOnHand")]
    pub on_hand: Decimal,

    #[serde(rename = "QtyCommitSales")]
    pub committed_sales: Decimal,

    #[serde(rename = "QtyReserved")]
    pub reserved: Decimal,
}

impl LotRow {
    /// `available = on_hand - committed_sales`. Does not clamp at zero — a
    /// negative result is an invariant violation the caller must detect.
    pub fn available(&self) -> Decimal {
        self.on_hand - self.committed_sales
    }
}

/// Single-character legacy lot status classification (e.g. `B`/`C`/`P`).
/// Kept as a raw character rather than a closed enum: the legacy column
/// also tolerates blanks and codes this engine never needs to interpret,
/// only echo back verbatim on the receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotStatus(pub char);

impl LotStatus {
    pub const BLANK: LotStatus = LotStatus(' ');

    pub fn as_char(&self) -> char {
        self.0
    }
}

impl fmt::Display for LotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LotStatus {
    fn from(s: &str) -> Self {
        LotStatus(s.trim().chars().next().unwrap_or(' '))
    }
}

/// Minimal key identifying a lot row for the purposes of the engine's reads
/// and locked re-reads. Does not carry the lot's mutable fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LotKey {
    pub item_key: String,
    pub location_key: String,
    pub lot_no: String,
    pub bin_no: String,
}
