use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tracing::warn;
use uuid::Uuid;

use deskward_application::{GrantRepository, role_list};
use deskward_core::{AppError, AppResult, DepartmentId};
use deskward_domain::{PermissionGrant, PermissionKey, Role};

/// PostgreSQL-backed grant table.
#[derive(Clone)]
pub struct PostgresGrantRepository {
    pool: PgPool,
}

impl PostgresGrantRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct GrantRow {
    role: String,
    permission: String,
    department_id: Option<Uuid>,
}

impl TryFrom<GrantRow> for PermissionGrant {
    type Error = AppError;

    fn try_from(row: GrantRow) -> Result<Self, Self::Error> {
        let role = row.role.parse::<Role>().map_err(|error| {
            AppError::Internal(format!("stored grant has invalid role '{}': {error}", row.role))
        })?;
        let permission = row.permission.parse::<PermissionKey>().map_err(|error| {
            AppError::Internal(format!(
                "stored grant has invalid permission '{}': {error}",
                row.permission
            ))
        })?;

        Ok(Self {
            role,
            permission,
            department_id: row.department_id.map(DepartmentId::from_uuid),
        })
    }
}

/// Converts stored rows, skipping any whose role or permission is unrecognized.
///
/// Unknown rows grant nothing, so the remaining grants still decide access.
fn known_grants(rows: Vec<GrantRow>) -> Vec<PermissionGrant> {
    rows.into_iter()
        .filter_map(|row| match PermissionGrant::try_from(row) {
            Ok(grant) => Some(grant),
            Err(error) => {
                warn!(%error, "ignoring unrecognized permission grant row");
                None
            }
        })
        .collect()
}

fn role_values(roles: &[Role]) -> Vec<String> {
    roles.iter().map(|role| role.as_str().to_owned()).collect()
}

#[async_trait]
impl GrantRepository for PostgresGrantRepository {
    async fn list_grants_for_role(&self, role: Role) -> AppResult<Vec<PermissionGrant>> {
        let rows = sqlx::query_as::<_, GrantRow>(
            r#"
            SELECT role, permission, department_id
            FROM permission_grants
            WHERE role = $1
            ORDER BY permission, department_id NULLS FIRST
            "#,
        )
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list grants for role '{}': {error}",
                role.as_str()
            ))
        })?;

        Ok(known_grants(rows))
    }

    async fn list_grants(&self) -> AppResult<Vec<PermissionGrant>> {
        let rows = sqlx::query_as::<_, GrantRow>(
            r#"
            SELECT role, permission, department_id
            FROM permission_grants
            ORDER BY role, permission, department_id NULLS FIRST
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list grants: {error}")))?;

        Ok(known_grants(rows))
    }

    async fn delete_grants_for_roles(&self, roles: &[Role]) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM permission_grants
            WHERE role = ANY($1)
            "#,
        )
        .bind(role_values(roles))
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to delete grants for roles [{}]: {error}",
                role_list(roles)
            ))
        })?;

        Ok(result.rows_affected())
    }

    async fn insert_grants(&self, grants: &[PermissionGrant]) -> AppResult<()> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        insert_grant_rows(&mut transaction, grants).await?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(())
    }

    async fn replace_grants_for_roles(
        &self,
        roles: &[Role],
        grants: &[PermissionGrant],
    ) -> AppResult<()> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        sqlx::query(
            r#"
            DELETE FROM permission_grants
            WHERE role = ANY($1)
            "#,
        )
        .bind(role_values(roles))
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to delete grants for roles [{}]: {error}",
                role_list(roles)
            ))
        })?;

        insert_grant_rows(&mut transaction, grants).await?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to commit grant replacement for roles [{}]: {error}",
                role_list(roles)
            ))
        })?;

        Ok(())
    }
}

async fn insert_grant_rows(
    transaction: &mut Transaction<'_, Postgres>,
    grants: &[PermissionGrant],
) -> AppResult<()> {
    for grant in grants {
        sqlx::query(
            r#"
            INSERT INTO permission_grants (role, permission, department_id)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(grant.role.as_str())
        .bind(grant.permission.as_str())
        .bind(grant.department_id.map(|department_id| department_id.as_uuid()))
        .execute(&mut **transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to persist grant '{}' for role '{}': {error}",
                grant.permission.as_str(),
                grant.role.as_str()
            ))
        })?;
    }

    Ok(())
}
