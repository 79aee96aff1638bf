use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use deskward_application::TicketRepository;
use deskward_core::{AppError, AppResult, DepartmentId, SlaPolicyId, TicketId, UserId};
use deskward_domain::{Ticket, TicketPriority};

/// PostgreSQL-backed ticket store.
///
/// Department membership lives in `ticket_departments`, where `position`
/// preserves assignment order.
#[derive(Clone)]
pub struct PostgresTicketRepository {
    pool: PgPool,
}

impl PostgresTicketRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TicketRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    priority: String,
    assigned_to: Option<Uuid>,
    sla_policy_id: Option<Uuid>,
    created_by: Uuid,
}

#[async_trait]
impl TicketRepository for PostgresTicketRepository {
    async fn find_ticket(&self, ticket_id: TicketId) -> AppResult<Option<Ticket>> {
        let row = sqlx::query_as::<_, TicketRow>(
            r#"
            SELECT id, title, description, priority, assigned_to, sla_policy_id, created_by
            FROM tickets
            WHERE id = $1
            "#,
        )
        .bind(ticket_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load ticket '{ticket_id}': {error}"))
        })?;

        let Some(row) = row else {
            return Ok(None);
        };

        let department_ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT department_id
            FROM ticket_departments
            WHERE ticket_id = $1
            ORDER BY position
            "#,
        )
        .bind(ticket_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to load departments of ticket '{ticket_id}': {error}"
            ))
        })?;

        let priority = row.priority.parse::<TicketPriority>().map_err(|error| {
            AppError::Internal(format!(
                "ticket '{ticket_id}' has invalid stored priority: {error}"
            ))
        })?;

        Ticket::new(
            TicketId::from_uuid(row.id),
            row.title,
            row.description,
            priority,
            department_ids.into_iter().map(DepartmentId::from_uuid).collect(),
            row.assigned_to.map(UserId::from_uuid),
            row.sla_policy_id.map(SlaPolicyId::from_uuid),
            UserId::from_uuid(row.created_by),
        )
        .map(Some)
        .map_err(|error| {
            AppError::Internal(format!("stored ticket '{ticket_id}' is invalid: {error}"))
        })
    }

    async fn insert_ticket(&self, ticket: &Ticket) -> AppResult<()> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        sqlx::query(
            r#"
            INSERT INTO tickets (
                id,
                title,
                description,
                priority,
                assigned_to,
                sla_policy_id,
                created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(ticket.id().as_uuid())
        .bind(ticket.title().as_str())
        .bind(ticket.description())
        .bind(ticket.priority().as_str())
        .bind(ticket.assigned_to().map(|user_id| user_id.as_uuid()))
        .bind(ticket.sla_policy_id().map(|policy_id| policy_id.as_uuid()))
        .bind(ticket.created_by().as_uuid())
        .execute(&mut *transaction)
        .await
        .map_err(|error| map_ticket_conflict(error, ticket.id()))?;

        insert_department_rows(&mut transaction, ticket).await?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(())
    }

    async fn update_ticket(&self, ticket: &Ticket) -> AppResult<()> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        let rows_affected = sqlx::query(
            r#"
            UPDATE tickets
            SET title = $2,
                description = $3,
                priority = $4,
                assigned_to = $5,
                sla_policy_id = $6,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(ticket.id().as_uuid())
        .bind(ticket.title().as_str())
        .bind(ticket.description())
        .bind(ticket.priority().as_str())
        .bind(ticket.assigned_to().map(|user_id| user_id.as_uuid()))
        .bind(ticket.sla_policy_id().map(|policy_id| policy_id.as_uuid()))
        .execute(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update ticket: {error}")))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "ticket '{}' was not found",
                ticket.id()
            )));
        }

        sqlx::query(
            r#"
            DELETE FROM ticket_departments
            WHERE ticket_id = $1
            "#,
        )
        .bind(ticket.id().as_uuid())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to clear ticket departments: {error}"))
        })?;

        insert_department_rows(&mut transaction, ticket).await?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(())
    }
}

fn map_ticket_conflict(error: sqlx::Error, ticket_id: TicketId) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(format!("ticket '{ticket_id}' already exists"));
    }

    AppError::Internal(format!("failed to insert ticket: {error}"))
}

async fn insert_department_rows(
    transaction: &mut Transaction<'_, Postgres>,
    ticket: &Ticket,
) -> AppResult<()> {
    for (position, department_id) in ticket.department_ids().iter().enumerate() {
        let position = i32::try_from(position).map_err(|_| {
            AppError::Validation(format!(
                "ticket '{}' lists too many departments",
                ticket.id()
            ))
        })?;

        sqlx::query(
            r#"
            INSERT INTO ticket_departments (ticket_id, department_id, position)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(ticket.id().as_uuid())
        .bind(department_id.as_uuid())
        .bind(position)
        .execute(&mut **transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to persist department '{department_id}' for ticket: {error}"
            ))
        })?;
    }

    Ok(())
}
