// Wire contract for `listRemarks` (spec §4.6/§6): `[ {id, name} ]`. The
// catalog's `active` flag is internal filtering state, never echoed to the
// caller — only approved, active remarks are listed at all.

use bin_transfer_engine::models::remark::RemarkOption;
use serde_json::json;

#[test]
fn remark_option_serializes_without_the_active_flag() {
    let remark = RemarkOption {
        id: 3,
        name: "Stock rotation".to_string(),
        active: true,
    };
    let value = serde_json::to_value(&remark).unwrap();
    assert_eq!(value["id"], json!(3));
    assert_eq!(value["name"], json!("Stock rotation"));
    assert!(value.get("active").is_none());
}

#[test]
fn remark_list_preserves_catalog_order() {
    let catalog = vec![
        RemarkOption { id: 1, name: "Cycle count adjustment".to_string(), active: true },
        RemarkOption { id: 2, name: "Quality hold release".to_string(), active: true },
        RemarkOption { id: 3, name: "Stock rotation".to_string(), active: true },
    ];
    let value = serde_json::to_value(&catalog).unwrap();
    let names: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Cycle count adjustment", "Quality hold release", "Stock rotation"]);
}

#[test]
fn empty_remark_name_is_a_valid_no_remark_selection() {
    let remark = RemarkOption { id: 0, name: String::new(), active: true };
    let value = serde_json::to_value(&remark).unwrap();
    assert_eq!(value["name"], json!(""));
}
