use async_trait::async_trait;
use sqlx::PgPool;

use deskward_application::{AssignmentSignal, AssignmentSignalSink};
use deskward_core::{AppError, AppResult};

/// Assignment signal sink that appends to the `ticket_assignment_signals` outbox.
///
/// Rows stay pending until a delivery process stamps `delivered_at`.
#[derive(Clone)]
pub struct PostgresAssignmentOutbox {
    pool: PgPool,
}

impl PostgresAssignmentOutbox {
    /// Creates an outbox writer with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssignmentSignalSink for PostgresAssignmentOutbox {
    async fn publish(&self, signal: AssignmentSignal) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO ticket_assignment_signals (
                ticket_id,
                previous_assignee,
                new_assignee,
                changed_by,
                occurred_at
            )
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(signal.ticket_id.as_uuid())
        .bind(signal.previous_assignee.map(|user_id| user_id.as_uuid()))
        .bind(signal.new_assignee.map(|user_id| user_id.as_uuid()))
        .bind(signal.changed_by.as_uuid())
        .bind(signal.occurred_at)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to enqueue assignment signal for ticket '{}': {error}",
                signal.ticket_id
            ))
        })?;

        Ok(())
    }
}
