// Precondition Gate (spec §4.2) — check 1 ("destination bin is non-empty,
// trimmed, and different from source bin") is the only check in the gate
// that touches no store, so it is the only one exercisable without a
// database connection. The remaining five checks are integration-level and
// are covered by the ordering/shape asserted in `services::preconditions::gate`.

use bin_transfer_engine::error::EngineError;
use bin_transfer_engine::services::preconditions::check_bins_differ;

#[test]
fn s3_same_bin_as_source_is_rejected() {
    let err = check_bins_differ("K0802-4B", "K0802-4B").unwrap_err();
    assert!(matches!(err, EngineError::InvalidBin { .. }));
    assert_eq!(err.kind(), "InvalidBin");
}

#[test]
fn same_bin_case_and_whitespace_insensitive() {
    let err = check_bins_differ(" K0802-4B ", "k0802-4b").unwrap_err();
    assert!(matches!(err, EngineError::InvalidBin { .. }));
}

#[test]
fn blank_destination_is_rejected() {
    let err = check_bins_differ("K0802-4B", "   ").unwrap_err();
    assert!(matches!(err, EngineError::InvalidBin { .. }));
}

#[test]
fn distinct_trimmed_bins_pass() {
    assert!(check_bins_differ("K0802-4B", " WHKON1 ").is_ok());
}

#[test]
fn distinct_bins_differing_only_by_suffix_pass() {
    // Regression guard: must compare whole trimmed strings, not prefixes.
    assert!(check_bins_differ("K0802-4B", "K0802-4BX").is_ok());
}
