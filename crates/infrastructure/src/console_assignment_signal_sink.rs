//! Console assignment signal sink for development. Logs signals to tracing output.

use async_trait::async_trait;
use deskward_application::{AssignmentSignal, AssignmentSignalSink};
use deskward_core::AppResult;
use tracing::info;

/// Development signal sink that logs assignment changes to the console.
#[derive(Clone)]
pub struct ConsoleAssignmentSignalSink;

impl ConsoleAssignmentSignalSink {
    /// Creates a new console signal sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleAssignmentSignalSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssignmentSignalSink for ConsoleAssignmentSignalSink {
    async fn publish(&self, signal: AssignmentSignal) -> AppResult<()> {
        info!(
            ticket_id = %signal.ticket_id,
            previous_assignee = ?signal.previous_assignee,
            new_assignee = ?signal.new_assignee,
            changed_by = %signal.changed_by,
            occurred_at = %signal.occurred_at,
            "assignment signal (console)"
        );

        Ok(())
    }
}
