use std::collections::HashMap;

use async_trait::async_trait;
use deskward_application::DirectoryRepository;
use deskward_core::{AppResult, DepartmentId, UserId};
use deskward_domain::{Department, Role, UserContext};
use tokio::sync::RwLock;

/// In-memory user and department directory.
#[derive(Debug, Default)]
pub struct InMemoryDirectoryRepository {
    users: RwLock<HashMap<UserId, UserContext>>,
    departments: RwLock<HashMap<DepartmentId, Department>>,
}

impl InMemoryDirectoryRepository {
    /// Creates an empty in-memory directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a department.
    pub async fn save_department(&self, department: Department) {
        self.departments
            .write()
            .await
            .insert(department.id, department);
    }

    /// Adds or replaces a user's role and department.
    pub async fn save_user(&self, user_id: UserId, context: UserContext) {
        self.users.write().await.insert(user_id, context);
    }
}

#[async_trait]
impl DirectoryRepository for InMemoryDirectoryRepository {
    async fn find_user_context(&self, user_id: UserId) -> AppResult<Option<UserContext>> {
        Ok(self.users.read().await.get(&user_id).copied())
    }

    async fn list_department_head_ids(
        &self,
        department_id: DepartmentId,
    ) -> AppResult<Vec<UserId>> {
        let mut head_ids: Vec<UserId> = self
            .users
            .read()
            .await
            .iter()
            .filter(|(_, context)| {
                context.role == Role::DepartmentHead
                    && context.department_id == Some(department_id)
            })
            .map(|(user_id, _)| *user_id)
            .collect();
        head_ids.sort_unstable();

        Ok(head_ids)
    }

    async fn find_departments(
        &self,
        department_ids: &[DepartmentId],
    ) -> AppResult<Vec<Department>> {
        let departments = self.departments.read().await;

        Ok(department_ids
            .iter()
            .filter_map(|department_id| departments.get(department_id).cloned())
            .collect())
    }
}
