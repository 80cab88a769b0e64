//! MySQL outbox operations over a per-datacenter pool.

use sqlx::{MySql, MySqlPool, Transaction};
use uuid::Uuid;

use super::models::ResetOutcome;
use crate::error::GatewayError;

/// Receipt ids for one aggregate, via the parent outbox rows.
const SELECT_RECEIPT_IDS: &str = "SELECT osr.id FROM outbox_send_receipt osr \
     WHERE osr.outbox_id IN (SELECT id FROM outbox o WHERE o.aggregate_id = ?)";

/// Unconditional status reset; affects 0 rows when the aggregate is absent.
const RESET_STATUS: &str = "UPDATE outbox SET status = 'PENDING' WHERE aggregate_id = ?";

/// Single-row status read with an undefined tie-break on duplicates.
const SELECT_STATUS: &str = "SELECT status FROM outbox WHERE aggregate_id = ? LIMIT 1";

/// Outbox store bound to one datacenter's connection pool.
///
/// Cheap to construct per request: `MySqlPool` is a shared handle and
/// cloning it does not open connections.
#[derive(Debug, Clone)]
pub struct OutboxStore {
    pool: MySqlPool,
}

impl OutboxStore {
    /// Creates a store over the given pool.
    #[must_use]
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Resets an outbox record to `PENDING`, deleting its delivery
    /// receipts, in one atomic transaction.
    ///
    /// Steps: select the receipt ids for the aggregate, delete exactly
    /// those rows, then unconditionally update the record's status
    /// (the update runs even when zero receipts were found). Either
    /// all three steps commit together or none of their effects are
    /// observable.
    ///
    /// A missing aggregate is not an error: the outcome simply carries
    /// `updated_rows = 0`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::TransactionFailed`] on any database
    /// failure; the transaction is rolled back before the error is
    /// propagated.
    pub async fn reset_to_pending(&self, aggregate_id: Uuid) -> Result<ResetOutcome, GatewayError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(GatewayError::TransactionFailed)?;

        match reset_in_tx(&mut tx, aggregate_id).await {
            Ok(outcome) => {
                tx.commit().await.map_err(GatewayError::TransactionFailed)?;
                Ok(outcome)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(%aggregate_id, error = %rollback_err, "rollback failed");
                }
                Err(GatewayError::TransactionFailed(err))
            }
        }
    }

    /// Reads the current status of an outbox record.
    ///
    /// Returns `None` when no row matches the aggregate identifier.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::QueryFailed`] on database failure.
    pub async fn fetch_status(&self, aggregate_id: Uuid) -> Result<Option<String>, GatewayError> {
        sqlx::query_scalar::<_, String>(SELECT_STATUS)
            .bind(aggregate_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(GatewayError::QueryFailed)
    }

    /// Proves connectivity with a trivial round trip. The pool is
    /// created lazily, so this is the first moment a bad host or
    /// credential set can fail.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::QueryFailed`] when the probe fails.
    pub async fn ping(&self) -> Result<(), GatewayError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(GatewayError::QueryFailed)?;
        Ok(())
    }
}

/// The reset body, run inside an open transaction so the caller can
/// commit or roll back as one unit.
async fn reset_in_tx(
    tx: &mut Transaction<'_, MySql>,
    aggregate_id: Uuid,
) -> Result<ResetOutcome, sqlx::Error> {
    let deleted_ids: Vec<String> = sqlx::query_scalar::<_, String>(SELECT_RECEIPT_IDS)
        .bind(aggregate_id.to_string())
        .fetch_all(&mut **tx)
        .await?;

    let deleted_count = if deleted_ids.is_empty() {
        0
    } else {
        let sql = format!(
            "DELETE FROM outbox_send_receipt WHERE id IN ({})",
            placeholders(deleted_ids.len())
        );
        let mut query = sqlx::query(&sql);
        for id in &deleted_ids {
            query = query.bind(id);
        }
        query.execute(&mut **tx).await?.rows_affected()
    };

    let updated_rows = sqlx::query(RESET_STATUS)
        .bind(aggregate_id.to_string())
        .execute(&mut **tx)
        .await?
        .rows_affected();

    Ok(ResetOutcome {
        deleted_ids,
        deleted_count,
        updated_rows,
    })
}

/// `?, ?, ...` for an `IN` list of `n` bound values.
fn placeholders(n: usize) -> String {
    let mut out = String::with_capacity(n.saturating_mul(3));
    for i in 0..n {
        if i > 0 {
            out.push_str(", ");
        }
        out.push('?');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_join_bind_markers() {
        assert_eq!(placeholders(1), "?");
        assert_eq!(placeholders(3), "?, ?, ?");
        assert_eq!(placeholders(0), "");
    }

    #[test]
    fn receipt_select_scopes_by_aggregate() {
        assert!(SELECT_RECEIPT_IDS.contains("outbox_send_receipt"));
        assert!(SELECT_RECEIPT_IDS.contains("o.aggregate_id = ?"));
    }

    #[test]
    fn status_queries_target_the_outbox_table() {
        assert!(RESET_STATUS.starts_with("UPDATE outbox SET status = 'PENDING'"));
        assert!(SELECT_STATUS.ends_with("LIMIT 1"));
    }
}
