use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use deskward_application::SlaPolicyRepository;
use deskward_core::{AppError, AppResult, DepartmentId, SlaPolicyId};
use deskward_domain::{SlaPolicy, TicketPriority};

/// PostgreSQL-backed SLA policy table.
#[derive(Clone)]
pub struct PostgresSlaPolicyRepository {
    pool: PgPool,
}

impl PostgresSlaPolicyRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SlaPolicyRow {
    id: Uuid,
    name: String,
    priority: String,
    department_id: Option<Uuid>,
    first_response_minutes: i32,
    resolution_minutes: i32,
}

impl SlaPolicyRow {
    fn into_policy(self) -> AppResult<SlaPolicy> {
        let priority = self.priority.parse::<TicketPriority>().map_err(|error| {
            AppError::Internal(format!(
                "sla policy '{}' has invalid stored priority: {error}",
                self.id
            ))
        })?;

        Ok(SlaPolicy {
            id: SlaPolicyId::from_uuid(self.id),
            name: self.name,
            priority,
            department_id: self.department_id.map(DepartmentId::from_uuid),
            first_response_minutes: minutes(self.id, self.first_response_minutes)?,
            resolution_minutes: minutes(self.id, self.resolution_minutes)?,
        })
    }
}

fn minutes(policy_id: Uuid, value: i32) -> AppResult<u32> {
    u32::try_from(value).map_err(|_| {
        AppError::Internal(format!(
            "sla policy '{policy_id}' has a negative target of {value} minutes"
        ))
    })
}

#[async_trait]
impl SlaPolicyRepository for PostgresSlaPolicyRepository {
    async fn list_policies_for_priority(
        &self,
        priority: TicketPriority,
    ) -> AppResult<Vec<SlaPolicy>> {
        let rows = sqlx::query_as::<_, SlaPolicyRow>(
            r#"
            SELECT id, name, priority, department_id, first_response_minutes, resolution_minutes
            FROM sla_policies
            WHERE priority = $1
            ORDER BY id
            "#,
        )
        .bind(priority.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list sla policies for priority '{}': {error}",
                priority.as_str()
            ))
        })?;

        rows.into_iter().map(SlaPolicyRow::into_policy).collect()
    }

    async fn list_policies(&self) -> AppResult<Vec<SlaPolicy>> {
        let rows = sqlx::query_as::<_, SlaPolicyRow>(
            r#"
            SELECT id, name, priority, department_id, first_response_minutes, resolution_minutes
            FROM sla_policies
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list sla policies: {error}")))?;

        rows.into_iter().map(SlaPolicyRow::into_policy).collect()
    }
}
