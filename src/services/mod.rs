pub mod availability;
pub mod bin_service;
pub mod lot_service;
pub mod preconditions;
pub mod receipt_service;
pub mod reconciliation;
pub mod remarks_service;
pub mod sequence_service;
pub mod transfer_committed_service;
pub mod transfer_service;
