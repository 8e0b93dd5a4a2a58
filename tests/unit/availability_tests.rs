// Availability Calculator (spec §4.1) — pure-logic coverage that needs no
// database: the `10⁻³` tolerance comparison and the invariant check that
// guards every snapshot before a write path is allowed to use it.

use bin_transfer_engine::models::lot::{LotRow, LotStatus};
use bin_transfer_engine::services::availability::{snapshot_from, within_tolerance};
use rust_decimal::Decimal;

fn lot(on_hand: i64, committed_sales: i64) -> LotRow {
    LotRow {
        lot_no: "2600107-1".to_string(),
        item_key: "INBC1403".to_string(),
        location_key: "TFC1".to_string(),
        bin_no: "K0802-4B".to_string(),
        vendor_key: "V001".to_string(),
        vendor_lot_no: "VL-1".to_string(),
        date_received: None,
        date_expiry: None,
        lot_status: LotStatus::from("P"),
        on_hand: Decimal::new(on_hand, 0),
        committed_sales: Decimal::new(committed_sales, 0),
        reserved: Decimal::ZERO,
    }
}

#[test]
fn s1_available_matches_worked_example() {
    // S1: on_hand=975, committed_sales=50 -> available=925
    let snapshot = snapshot_from(lot(975, 50), Decimal::new(50, 0)).unwrap();
    assert_eq!(snapshot.on_hand(), Decimal::new(975, 0));
    assert_eq!(snapshot.committed_sales(), Decimal::new(50, 0));
    assert_eq!(snapshot.available(), Decimal::new(925, 0));
}

#[test]
fn qty_equal_to_available_succeeds_at_the_boundary() {
    let snapshot = snapshot_from(lot(975, 50), Decimal::ZERO).unwrap();
    let requested = snapshot.available();
    assert!(!(requested > snapshot.available()) || within_tolerance(requested, snapshot.available()));
}

#[test]
fn qty_over_available_by_one_ten_thousandth_is_within_tolerance() {
    let available = Decimal::new(925, 0);
    let requested = available + Decimal::new(1, 4);
    assert!(requested > available);
    assert!(within_tolerance(requested, available));
}

#[test]
fn qty_over_available_by_one_hundredth_fails_tolerance() {
    let available = Decimal::new(925, 0);
    let requested = available + Decimal::new(1, 2);
    assert!(requested > available);
    assert!(!within_tolerance(requested, available));
}

#[test]
fn negative_available_is_rejected_before_any_write_is_attempted() {
    // A row that somehow has committed_sales > on_hand must never be used
    // to authorize a transfer — this is the re-read-under-UPDLOCK guard.
    let result = snapshot_from(lot(10, 20), Decimal::ZERO);
    assert!(result.is_err());
}

#[test]
fn zero_available_is_not_an_invariant_violation() {
    let snapshot = snapshot_from(lot(50, 50), Decimal::new(50, 0)).unwrap();
    assert_eq!(snapshot.available(), Decimal::ZERO);
}

#[test]
fn tolerance_is_symmetric() {
    let a = Decimal::new(925, 0);
    let b = a + Decimal::new(1, 4);
    assert_eq!(within_tolerance(a, b), within_tolerance(b, a));
}
