use serde::{Deserialize, Serialize};

/// A single approved textual annotation a caller may attach to a transfer.
/// Database table: cust_TransferRemark. Read-only to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemarkOption {
    pub id: i32,
    pub name: String,
    #[serde(skip_serializing)]
    pub active: bool,
}
