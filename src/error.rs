use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

/// Error taxonomy for the transfer engine (spec §6/§7).
///
/// Each variant is one of the wire error kinds the caller can match on.
/// Variants carry only the context the spec asks the caller to be able to
/// render a message from (requested/available figures, offending bin, ...).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("lot not found: item={item_key} location={location_key} lot={lot_no} bin={bin_no}")]
    LotNotFound {
        item_key: String,
        location_key: String,
        lot_no: String,
        bin_no: String,
    },

    #[error("invalid bin '{bin_no}': {message}")]
    InvalidBin { bin_no: String, message: String },

    #[error("requested quantity {requested} exceeds available {available}")]
    InsufficientQuantity {
        requested: rust_decimal::Decimal,
        available: rust_decimal::Decimal,
    },

    #[error("requested quantity {requested} exceeds committed {committed}")]
    InsufficientCommitted {
        requested: rust_decimal::Decimal,
        committed: rust_decimal::Decimal,
    },

    #[error("selected pending rows sum to {selected} but {requested} was requested")]
    SelectionMismatch {
        requested: rust_decimal::Decimal,
        selected: rust_decimal::Decimal,
    },

    #[error("inventory is frozen")]
    InventoryFrozen,

    #[error("physical count in progress: item={item_key} location={location_key}")]
    PhysicalCountInProgress {
        item_key: String,
        location_key: String,
    },

    #[error("item {item_key} is not transferrable (not serial-lot-tracked / multi-bin)")]
    NotTransferrable { item_key: String },

    #[error("unauthorized")]
    Unauthorized,

    #[error("lock contention, retry with backoff")]
    Contention,

    #[error("operation timed out, retry with backoff")]
    Timeout,

    #[error("system error: {0}")]
    SystemError(String),

    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl EngineError {
    /// The wire `<kind>` discriminant from spec §6.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::LotNotFound { .. } => "LotNotFound",
            EngineError::InvalidBin { .. } => "InvalidBin",
            EngineError::InsufficientQuantity { .. } => "InsufficientQuantity",
            EngineError::InsufficientCommitted { .. } => "InsufficientCommitted",
            EngineError::SelectionMismatch { .. } => "SelectionMismatch",
            EngineError::InventoryFrozen => "InventoryFrozen",
            EngineError::PhysicalCountInProgress { .. } => "PhysicalCountInProgress",
            EngineError::NotTransferrable { .. } => "NotTransferrable",
            EngineError::Unauthorized => "Unauthorized",
            EngineError::Contention => "Contention",
            EngineError::Timeout => "Timeout",
            EngineError::SystemError(_) => "SystemError",
            EngineError::InvariantViolation(_) => "InvariantViolation",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            EngineError::LotNotFound { .. } => StatusCode::NOT_FOUND,
            EngineError::InvalidBin { .. } | EngineError::SelectionMismatch { .. } => {
                StatusCode::BAD_REQUEST
            }
            EngineError::InsufficientQuantity { .. }
            | EngineError::InsufficientCommitted { .. } => StatusCode::CONFLICT,
            EngineError::InventoryFrozen
            | EngineError::PhysicalCountInProgress { .. }
            | EngineError::NotTransferrable { .. } => StatusCode::CONFLICT,
            EngineError::Unauthorized => StatusCode::UNAUTHORIZED,
            EngineError::Contention | EngineError::Timeout => StatusCode::SERVICE_UNAVAILABLE,
            EngineError::SystemError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            EngineError::InvariantViolation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Context fields flattened into the wire envelope alongside
    /// `success`/`error`/`message` (spec §6 error envelope).
    fn context(&self) -> Value {
        match self {
            EngineError::LotNotFound {
                item_key,
                location_key,
                lot_no,
                bin_no,
            } => json!({
                "itemKey": item_key,
                "location": location_key,
                "lotNo": lot_no,
                "binNo": bin_no,
            }),
            EngineError::InvalidBin { bin_no, .. } => json!({ "binNo": bin_no }),
            EngineError::InsufficientQuantity {
                requested,
                available,
            } => json!({ "requested": requested, "available": available }),
            EngineError::InsufficientCommitted {
                requested,
                committed,
            } => json!({ "requested": requested, "committed": committed }),
            EngineError::SelectionMismatch {
                requested,
                selected,
            } => json!({ "requested": requested, "selected": selected }),
            EngineError::PhysicalCountInProgress {
                item_key,
                location_key,
            } => json!({ "itemKey": item_key, "location": location_key }),
            EngineError::NotTransferrable { item_key } => json!({ "itemKey": item_key }),
            _ => Value::Null,
        }
    }

    /// Whether the caller may retry this error with jittered backoff (§7).
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::Contention | EngineError::Timeout)
    }
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let correlation_id = Uuid::new_v4().to_string();
        let status = self.status();
        let kind = self.kind();

        // SystemError and InvariantViolation must not leak internals to the
        // caller; everything else is safe to echo back verbatim.
        let message = match &self {
            EngineError::SystemError(_) | EngineError::InvariantViolation(_) => {
                tracing::error!(
                    correlation_id = %correlation_id,
                    error_kind = kind,
                    error = %self,
                    "transfer engine system error"
                );
                "an internal error occurred".to_string()
            }
            _ => {
                tracing::warn!(
                    correlation_id = %correlation_id,
                    error_kind = kind,
                    error = %self,
                    "transfer request rejected"
                );
                self.to_string()
            }
        };

        let mut body = json!({
            "success": false,
            "error": kind,
            "message": message,
            "correlationId": correlation_id,
        });

        if let Some(context) = self.context().as_object() {
            if let Some(map) = body.as_object_mut() {
                for (k, v) in context {
                    map.insert(k.clone(), v.clone());
                }
            }
        }

        (status, Json(body)).into_response()
    }
}

impl From<tiberius::error::Error> for EngineError {
    fn from(err: tiberius::error::Error) -> Self {
        let message = err.to_string();
        let lower = message.to_lowercase();
        if lower.contains("timeout") {
            EngineError::Timeout
        } else if lower.contains("lock request time out") || lower.contains("deadlock") {
            EngineError::Contention
        } else {
            EngineError::SystemError(message)
        }
    }
}

impl From<bb8::RunError<tiberius::error::Error>> for EngineError {
    fn from(err: bb8::RunError<tiberius::error::Error>) -> Self {
        match err {
            bb8::RunError::User(e) => EngineError::from(e),
            bb8::RunError::TimedOut => EngineError::Contention,
        }
    }
}

impl From<bb8::RunError<bb8_tiberius::Error>> for EngineError {
    fn from(err: bb8::RunError<bb8_tiberius::Error>) -> Self {
        match err {
            bb8::RunError::User(e) => EngineError::SystemError(e.to_string()),
            bb8::RunError::TimedOut => EngineError::Contention,
        }
    }
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
