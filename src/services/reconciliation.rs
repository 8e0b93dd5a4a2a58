use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::db::DbClient;
use crate::error::EngineResult;
use crate::models::lot::LotKey;

/// What a transfer coordinator asks its reconciliation mode to do to the
/// source/destination rows once the audit legs are written, inside the same
/// transaction.
#[derive(Debug, Clone, Copy)]
pub enum LegSide {
    Source,
    Destination,
}

/// The on-hand/processed-flag boundary a transfer coordinator calls through
/// after writing its paired audit rows (spec §9.1, resolution 3).
///
/// Only one implementation ships: the legacy behavior of leaving `on_hand`
/// and `processed` alone for the nightly batch job to reconcile. A direct
/// on-hand mode could be added behind this trait without touching either
/// coordinator, which is the point of the seam existing at all.
#[async_trait]
pub trait ReconciliationMode: Send + Sync {
    async fn reconcile(
        &self,
        client: &mut DbClient,
        key: &LotKey,
        side: LegSide,
        qty: Decimal,
    ) -> EngineResult<()>;
}

/// Ships the legacy behavior: on-hand and the `processed` flag on newly
/// written audit rows are left for the batch job. No statement is run.
pub struct LegacyBatchReconciliation;

#[async_trait]
impl ReconciliationMode for LegacyBatchReconciliation {
    async fn reconcile(
        &self,
        _client: &mut DbClient,
        _key: &LotKey,
        _side: LegSide,
        _qty: Decimal,
    ) -> EngineResult<()> {
        Ok(())
    }
}
