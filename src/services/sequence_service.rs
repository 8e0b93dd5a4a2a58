use tiberius::Query;

use crate::db::DbClient;
use crate::error::{EngineError, EngineResult};

/// Document Numbering (spec §4.3).
///
/// Unlike the donor's `get_next_value`, which increments the counter on its
/// own ungoverned connection outside of any caller transaction, this must
/// run on the same connection and inside the same transaction as the rest
/// of a transfer, so a rollback anywhere in the transfer undoes the bump
/// too. The caller passes a `Client` already inside `BEGIN TRAN`.
///
/// `UPDATE ... OUTPUT INSERTED.SeqNum` increments and returns the new value
/// in one round trip, so there's no window between the increment and the
/// read where a second caller could observe (or steal) the same number.
pub async fn next(client: &mut DbClient, seq_name: &str) -> EngineResult<String> {
    let sql = "UPDATE Seqnum SET SeqNum = SeqNum + 1 OUTPUT INSERTED.SeqNum WHERE SeqName = @P1";

    let mut query = Query::new(sql);
    query.bind(seq_name);

    let row = query
        .query(client)
        .await?
        .into_row()
        .await?
        .ok_or_else(|| {
            EngineError::SystemError(format!("sequence '{}' not found in Seqnum table", seq_name))
        })?;

    let seq_num: i32 = row
        .get(0)
        .ok_or_else(|| EngineError::SystemError("sequence number column not found".to_string()))?;

    tracing::debug!(seq_name = %seq_name, seq_num = %seq_num, "allocated document sequence number");

    Ok(format!("{}-{}", seq_name, seq_num))
}
