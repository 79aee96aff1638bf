use std::collections::HashMap;

use async_trait::async_trait;
use deskward_application::TicketRepository;
use deskward_core::{AppError, AppResult, TicketId};
use deskward_domain::Ticket;
use tokio::sync::RwLock;

/// In-memory ticket store.
#[derive(Debug, Default)]
pub struct InMemoryTicketRepository {
    tickets: RwLock<HashMap<TicketId, Ticket>>,
}

impl InMemoryTicketRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TicketRepository for InMemoryTicketRepository {
    async fn find_ticket(&self, ticket_id: TicketId) -> AppResult<Option<Ticket>> {
        Ok(self.tickets.read().await.get(&ticket_id).cloned())
    }

    async fn insert_ticket(&self, ticket: &Ticket) -> AppResult<()> {
        let mut tickets = self.tickets.write().await;
        if tickets.contains_key(&ticket.id()) {
            return Err(AppError::Conflict(format!(
                "ticket '{}' already exists",
                ticket.id()
            )));
        }

        tickets.insert(ticket.id(), ticket.clone());
        Ok(())
    }

    async fn update_ticket(&self, ticket: &Ticket) -> AppResult<()> {
        let mut tickets = self.tickets.write().await;
        let Some(stored) = tickets.get_mut(&ticket.id()) else {
            return Err(AppError::NotFound(format!(
                "ticket '{}' was not found",
                ticket.id()
            )));
        };

        *stored = ticket.clone();
        Ok(())
    }
}
