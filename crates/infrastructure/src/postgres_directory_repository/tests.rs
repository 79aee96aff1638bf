use deskward_application::DirectoryRepository;
use deskward_core::{DepartmentId, UserId};
use deskward_domain::{Role, UserContext};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use super::PostgresDirectoryRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres directory tests: {error}");
    }

    Some(pool)
}

async fn create_department(pool: &PgPool) -> DepartmentId {
    let department_id = DepartmentId::new();
    let insert = sqlx::query(
        r#"
            INSERT INTO departments (id, name)
            VALUES ($1, $2)
            "#,
    )
    .bind(department_id.as_uuid())
    .bind(format!("Department {department_id}"))
    .execute(pool)
    .await;

    assert!(insert.is_ok());
    department_id
}

async fn create_user(pool: &PgPool, role: Role, department_id: Option<DepartmentId>) -> UserId {
    let user_id = UserId::new();
    let insert = sqlx::query(
        r#"
            INSERT INTO app_users (id, display_name, role, department_id)
            VALUES ($1, 'Directory User', $2, $3)
            "#,
    )
    .bind(user_id.as_uuid())
    .bind(role.as_str())
    .bind(department_id.map(|department_id| department_id.as_uuid()))
    .execute(pool)
    .await;

    assert!(insert.is_ok());
    user_id
}

#[tokio::test]
async fn department_heads_are_listed_by_id_and_exclude_members() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresDirectoryRepository::new(pool.clone());
    let department_id = create_department(&pool).await;
    let first_head = create_user(&pool, Role::DepartmentHead, Some(department_id)).await;
    let second_head = create_user(&pool, Role::DepartmentHead, Some(department_id)).await;
    create_user(&pool, Role::Agent, Some(department_id)).await;
    create_user(&pool, Role::DepartmentHead, None).await;

    let mut expected = vec![first_head, second_head];
    expected.sort();

    let heads = repository.list_department_head_ids(department_id).await;
    assert_eq!(heads.ok(), Some(expected));
}

#[tokio::test]
async fn user_context_reflects_stored_role_and_department() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresDirectoryRepository::new(pool.clone());
    let department_id = create_department(&pool).await;
    let user_id = create_user(&pool, Role::Manager, Some(department_id)).await;

    let context = repository.find_user_context(user_id).await;
    assert_eq!(
        context.ok(),
        Some(Some(UserContext::new(Role::Manager, Some(department_id))))
    );

    let missing = repository.find_user_context(UserId::new()).await;
    assert_eq!(missing.ok(), Some(None));
}

#[tokio::test]
async fn find_departments_returns_only_stored_rows() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresDirectoryRepository::new(pool.clone());
    let department_id = create_department(&pool).await;

    let found = repository
        .find_departments(&[department_id, DepartmentId::new()])
        .await;
    let Ok(found) = found else {
        panic!("department lookup failed");
    };

    assert_eq!(found.len(), 1);
    assert_eq!(found.first().map(|department| department.id), Some(department_id));
}
