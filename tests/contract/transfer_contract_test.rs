// Wire contract for `transfer`/`transferCommitted` (spec §6). These assert
// the JSON shape travelling across the HTTP boundary — field names, optional
// fields, and the error envelope — independent of the database-backed
// handler logic, which needs a live SQL Server instance to exercise.

use bin_transfer_engine::error::EngineError;
use bin_transfer_engine::models::lot::LotStatus;
use bin_transfer_engine::models::transfer::{
    CommittedTransferRequest, TransferReceipt, TransferRequest, TransferResult,
};
use rust_decimal::Decimal;
use serde_json::json;

#[test]
fn transfer_request_deserializes_from_the_spec_wire_shape() {
    // S1 worked example.
    let body = json!({
        "lotNo": "2600107-1",
        "itemKey": "INBC1403",
        "location": "TFC1",
        "binFrom": "K0802-4B",
        "binTo": "WHKON1",
        "transferQty": "500",
        "userId": "DECHAWAT",
        "remarks": "Stock rotation",
        "referenced": "SO-9981"
    });

    let request: TransferRequest = serde_json::from_value(body).unwrap();
    assert_eq!(request.lot_no, "2600107-1");
    assert_eq!(request.item_key, "INBC1403");
    assert_eq!(request.bin_from, "K0802-4B");
    assert_eq!(request.bin_to, "WHKON1");
    assert_eq!(request.transfer_qty, Decimal::new(500, 0));
    assert_eq!(request.user_id, "DECHAWAT");
    assert_eq!(request.remarks.as_deref(), Some("Stock rotation"));
    assert_eq!(request.referenced.as_deref(), Some("SO-9981"));
}

#[test]
fn transfer_request_remarks_and_referenced_are_optional() {
    let body = json!({
        "lotNo": "2600107-1",
        "itemKey": "INBC1403",
        "location": "TFC1",
        "binFrom": "K0802-4B",
        "binTo": "WHKON1",
        "transferQty": "500",
        "userId": "DECHAWAT"
    });

    let request: TransferRequest = serde_json::from_value(body).unwrap();
    assert!(request.remarks.is_none());
    assert!(request.referenced.is_none());
}

#[test]
fn committed_transfer_request_carries_full_commit_flag() {
    let body = json!({
        "lotNo": "2600107-1",
        "itemKey": "INBC1403",
        "location": "TFC1",
        "binFrom": "K0802-4B",
        "binTo": "WHKON1",
        "transferQty": "50",
        "userId": "DECHAWAT",
        "fullCommit": true
    });

    let request: CommittedTransferRequest = serde_json::from_value(body).unwrap();
    assert!(request.full_commit);
    assert!(request.lot_tran_nos.is_empty());
}

#[test]
fn committed_transfer_request_carries_explicit_subset() {
    // S5 worked example: subset {row1(30), row2(30)} selected.
    let body = json!({
        "lotNo": "2600107-1",
        "itemKey": "INBC1403",
        "location": "TFC1",
        "binFrom": "K0802-4B",
        "binTo": "WHKON1",
        "transferQty": "60",
        "userId": "DECHAWAT",
        "lotTranNos": [101, 102]
    });

    let request: CommittedTransferRequest = serde_json::from_value(body).unwrap();
    assert!(!request.full_commit);
    assert_eq!(request.lot_tran_nos, vec![101, 102]);
}

#[test]
fn transfer_result_serializes_to_the_spec_success_envelope() {
    let result = TransferResult {
        success: true,
        document_no: "BT-10042".to_string(),
        message: "transfer committed".to_string(),
        timestamp: chrono::Utc::now(),
        source_lot_status: LotStatus::from("P"),
        destination_lot_status: LotStatus::from("P"),
        receipt: TransferReceipt {
            document_no: "BT-10042".to_string(),
            item_key: "INBC1403".to_string(),
            location: "TFC1".to_string(),
            bin_from: "K0802-4B".to_string(),
            bin_to: "WHKON1".to_string(),
            lot_no: "2600107-1".to_string(),
            on_hand: Decimal::new(925, 0),
            transfer_qty: Decimal::new(500, 0),
            lot_status: "P".to_string(),
            date: "28-07-26".to_string(),
            remark: "Stock rotation".to_string(),
            reference: Some("SO-9981".to_string()),
        },
    };

    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["success"], json!(true));
    assert_eq!(value["documentNo"], json!("BT-10042"));
    assert_eq!(value["sourceLotStatus"], json!("P"));
    assert_eq!(value["destinationLotStatus"], json!("P"));
    assert!(value.get("timestamp").is_some());
    assert_eq!(value["receipt"]["documentNo"], json!("BT-10042"));
    assert_eq!(value["receipt"]["lotNo"], json!("2600107-1"));
}

#[test]
fn error_kinds_match_the_spec_taxonomy() {
    let expected = [
        "LotNotFound",
        "InvalidBin",
        "InsufficientQuantity",
        "InsufficientCommitted",
        "SelectionMismatch",
        "InventoryFrozen",
        "PhysicalCountInProgress",
        "NotTransferrable",
        "Unauthorized",
        "Contention",
        "Timeout",
        "SystemError",
        "InvariantViolation",
    ];

    let errors: Vec<EngineError> = vec![
        EngineError::LotNotFound {
            item_key: "I".into(),
            location_key: "TFC1".into(),
            lot_no: "L".into(),
            bin_no: "B".into(),
        },
        EngineError::InvalidBin {
            bin_no: "B".into(),
            message: "same as source".into(),
        },
        EngineError::InsufficientQuantity {
            requested: Decimal::new(950, 0),
            available: Decimal::new(925, 0),
        },
        EngineError::InsufficientCommitted {
            requested: Decimal::new(60, 0),
            committed: Decimal::new(50, 0),
        },
        EngineError::SelectionMismatch {
            requested: Decimal::new(60, 0),
            selected: Decimal::new(50, 0),
        },
        EngineError::InventoryFrozen,
        EngineError::PhysicalCountInProgress {
            item_key: "I".into(),
            location_key: "TFC1".into(),
        },
        EngineError::NotTransferrable { item_key: "I".into() },
        EngineError::Unauthorized,
        EngineError::Contention,
        EngineError::Timeout,
        EngineError::SystemError("boom".into()),
        EngineError::InvariantViolation("negative available".into()),
    ];

    for (err, kind) in errors.iter().zip(expected.iter()) {
        assert_eq!(err.kind(), *kind);
    }
}

#[test]
fn s2_insufficient_quantity_reports_requested_and_available() {
    let err = EngineError::InsufficientQuantity {
        requested: Decimal::new(950, 0),
        available: Decimal::new(925, 0),
    };
    assert_eq!(err.kind(), "InsufficientQuantity");
    assert!(err.to_string().contains("950"));
    assert!(err.to_string().contains("925"));
    assert!(!err.is_retryable());
}

#[test]
fn contention_and_timeout_are_retryable_per_spec_seven() {
    assert!(EngineError::Contention.is_retryable());
    assert!(EngineError::Timeout.is_retryable());
}
