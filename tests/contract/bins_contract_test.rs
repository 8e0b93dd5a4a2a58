// Wire contract for `validateBin` (spec §6): `{ is_valid, message }`.

use bin_transfer_engine::models::bin::BinValidation;
use serde_json::json;

#[test]
fn bin_validation_serializes_camel_case_is_valid() {
    let validation = BinValidation {
        is_valid: true,
        message: "bin is valid".to_string(),
    };
    let value = serde_json::to_value(&validation).unwrap();
    assert_eq!(value["isValid"], json!(true));
    assert_eq!(value["message"], json!("bin is valid"));
}

#[test]
fn s3_invalid_destination_bin_round_trips() {
    let validation = BinValidation {
        is_valid: false,
        message: "bin 'K0802-4B' does not exist in location 'TFC1'".to_string(),
    };
    let value = serde_json::to_value(&validation).unwrap();
    assert_eq!(value["isValid"], json!(false));

    let round_tripped: BinValidation = serde_json::from_value(value).unwrap();
    assert!(!round_tripped.is_valid);
    assert_eq!(round_tripped.message, validation.message);
}
