use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use deskward_application::DirectoryRepository;
use deskward_core::{AppError, AppResult, DepartmentId, NonEmptyString, UserId};
use deskward_domain::{Department, Role, UserContext};

/// PostgreSQL-backed user and department directory.
#[derive(Clone)]
pub struct PostgresDirectoryRepository {
    pool: PgPool,
}

impl PostgresDirectoryRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserContextRow {
    role: String,
    department_id: Option<Uuid>,
}

#[derive(Debug, FromRow)]
struct DepartmentRow {
    id: Uuid,
    name: String,
}

#[async_trait]
impl DirectoryRepository for PostgresDirectoryRepository {
    async fn find_user_context(&self, user_id: UserId) -> AppResult<Option<UserContext>> {
        let row = sqlx::query_as::<_, UserContextRow>(
            r#"
            SELECT role, department_id
            FROM app_users
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load user context for '{user_id}': {error}"))
        })?;

        row.map(|row| {
            let role = row.role.parse::<Role>().map_err(|error| {
                AppError::Internal(format!("user '{user_id}' has invalid stored role: {error}"))
            })?;
            Ok(UserContext::new(
                role,
                row.department_id.map(DepartmentId::from_uuid),
            ))
        })
        .transpose()
    }

    async fn list_department_head_ids(
        &self,
        department_id: DepartmentId,
    ) -> AppResult<Vec<UserId>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id
            FROM app_users
            WHERE department_id = $1
              AND role = $2
            ORDER BY id
            "#,
        )
        .bind(department_id.as_uuid())
        .bind(Role::DepartmentHead.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list heads of department '{department_id}': {error}"
            ))
        })?;

        Ok(ids.into_iter().map(UserId::from_uuid).collect())
    }

    async fn find_departments(
        &self,
        department_ids: &[DepartmentId],
    ) -> AppResult<Vec<Department>> {
        let ids: Vec<Uuid> = department_ids
            .iter()
            .map(|department_id| department_id.as_uuid())
            .collect();

        let rows = sqlx::query_as::<_, DepartmentRow>(
            r#"
            SELECT id, name
            FROM departments
            WHERE id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load departments: {error}")))?;

        rows.into_iter()
            .map(|row| {
                Ok(Department {
                    id: DepartmentId::from_uuid(row.id),
                    name: NonEmptyString::new(row.name).map_err(|error| {
                        AppError::Internal(format!(
                            "department '{}' has an invalid stored name: {error}",
                            row.id
                        ))
                    })?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests;
