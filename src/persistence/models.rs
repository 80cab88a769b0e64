//! Result types reported by the outbox store.

use serde::Serialize;

/// Exactly what a reset transaction changed.
///
/// `deleted_ids` distinguishes "nothing to reprocess" (empty) from
/// "reprocessing triggered" (non-empty) independently of
/// `updated_rows`, which is 1 when the aggregate row exists and 0 when
/// it does not, regardless of receipts.
#[derive(Debug, Clone, Serialize)]
pub struct ResetOutcome {
    /// Identifiers of the delivery receipts deleted in the transaction.
    pub deleted_ids: Vec<String>,
    /// Number of receipts deleted (`deleted_ids.len()` as reported by
    /// the database).
    pub deleted_count: u64,
    /// Rows affected by the status update: 0 when no outbox row
    /// matches the aggregate identifier.
    pub updated_rows: u64,
}

impl ResetOutcome {
    /// Returns `true` when the transaction changed nothing: no
    /// receipts deleted and no outbox row matched.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.deleted_count == 0 && self.updated_rows == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_requires_both_counts_zero() {
        let missing = ResetOutcome {
            deleted_ids: Vec::new(),
            deleted_count: 0,
            updated_rows: 0,
        };
        assert!(missing.is_noop());

        let reset_only = ResetOutcome {
            deleted_ids: Vec::new(),
            deleted_count: 0,
            updated_rows: 1,
        };
        assert!(!reset_only.is_noop());
    }
}
