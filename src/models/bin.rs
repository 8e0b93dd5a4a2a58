use serde::{Deserialize, Serialize};

/// Bin master row — physical warehouse bin location.
/// Database table: BINMaster
/// Composite PK: (Location, BinNo)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinRow {
    #[serde(rename = "Location")]
    pub location: String,

    #[serde(rename = "BinNo")]
    pub bin_no: String,

    #[serde(rename = "Description")]
    pub description: Option<String>,
}

/// Result of `validateBin(location, bin)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinValidation {
    #[serde(rename = "isValid")]
    pub is_valid: bool,
    pub message: String,
}
