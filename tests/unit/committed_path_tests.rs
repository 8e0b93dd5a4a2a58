// Transfer Coordinator — committed-quantity path (spec §4.5). The three
// scenarios (over-ask, exact match, explicit subset) all reduce to
// `within_tolerance` comparisons over `Decimal` sums before any row lock is
// taken, so they are fully exercisable here without a database.

use bin_transfer_engine::services::availability::within_tolerance;
use rust_decimal::Decimal;

fn sum(parts: &[i64]) -> Decimal {
    parts.iter().fold(Decimal::ZERO, |acc, p| acc + Decimal::new(*p, 0))
}

#[test]
fn qty_greater_than_committed_is_insufficient() {
    let committed = Decimal::new(50, 0);
    let requested = Decimal::new(60, 0);
    assert!(requested > committed);
    assert!(!within_tolerance(requested, committed));
}

#[test]
fn s4_exact_match_is_a_full_commit() {
    // S4: committed_sales=50, request qty=50 -> auto-execute the whole set.
    let committed = Decimal::new(50, 0);
    let requested = Decimal::new(50, 0);
    assert!(within_tolerance(requested, committed));
}

#[test]
fn exact_match_within_tolerance_still_counts_as_full_commit() {
    let committed = Decimal::new(50, 0);
    let requested = committed + Decimal::new(1, 4); // 0.0001 over
    assert!(within_tolerance(requested, committed));
}

#[test]
fn s5_subset_of_pending_rows_sums_to_requested_qty() {
    // S5: three pending rows of 30, 30, 20 summing to committed_sales=80.
    // Selecting rows {30, 30} must sum to the requested qty=60.
    let all_rows = [30_i64, 30, 20];
    assert_eq!(sum(&all_rows), Decimal::new(80, 0));

    let subset = [30_i64, 30];
    let requested = Decimal::new(60, 0);
    assert!(within_tolerance(sum(&subset), requested));

    let remaining_committed = sum(&all_rows) - requested;
    assert_eq!(remaining_committed, Decimal::new(20, 0));
}

#[test]
fn subset_sum_mismatch_is_not_within_tolerance() {
    let subset = [30_i64, 20]; // sums to 50, not the requested 60
    let requested = Decimal::new(60, 0);
    assert!(!within_tolerance(sum(&subset), requested));
}

#[test]
fn empty_subset_never_matches_a_positive_request() {
    let subset: [i64; 0] = [];
    let requested = Decimal::new(60, 0);
    assert!(!within_tolerance(sum(&subset), requested));
}

#[test]
fn partial_request_below_committed_is_not_a_full_commit() {
    let committed = Decimal::new(80, 0);
    let requested = Decimal::new(60, 0);
    assert!(!within_tolerance(requested, committed));
}
