use async_trait::async_trait;
use deskward_application::SlaPolicyRepository;
use deskward_core::AppResult;
use deskward_domain::{SlaPolicy, TicketPriority};
use tokio::sync::RwLock;

/// In-memory SLA policy table.
#[derive(Debug, Default)]
pub struct InMemorySlaPolicyRepository {
    policies: RwLock<Vec<SlaPolicy>>,
}

impl InMemorySlaPolicyRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a policy by identifier.
    pub async fn save_policy(&self, policy: SlaPolicy) {
        let mut policies = self.policies.write().await;
        policies.retain(|stored| stored.id != policy.id);
        policies.push(policy);
    }
}

#[async_trait]
impl SlaPolicyRepository for InMemorySlaPolicyRepository {
    async fn list_policies_for_priority(
        &self,
        priority: TicketPriority,
    ) -> AppResult<Vec<SlaPolicy>> {
        Ok(self
            .policies
            .read()
            .await
            .iter()
            .filter(|policy| policy.priority == priority)
            .cloned()
            .collect())
    }

    async fn list_policies(&self) -> AppResult<Vec<SlaPolicy>> {
        Ok(self.policies.read().await.clone())
    }
}
