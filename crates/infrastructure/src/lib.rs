//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod console_assignment_signal_sink;
mod in_memory_audit_repository;
mod in_memory_directory_repository;
mod in_memory_grant_repository;
mod in_memory_sla_policy_repository;
mod in_memory_ticket_repository;
mod postgres_assignment_outbox;
mod postgres_audit_repository;
mod postgres_directory_repository;
mod postgres_grant_repository;
mod postgres_sla_policy_repository;
mod postgres_ticket_repository;

pub use console_assignment_signal_sink::ConsoleAssignmentSignalSink;
pub use in_memory_audit_repository::InMemoryAuditRepository;
pub use in_memory_directory_repository::InMemoryDirectoryRepository;
pub use in_memory_grant_repository::InMemoryGrantRepository;
pub use in_memory_sla_policy_repository::InMemorySlaPolicyRepository;
pub use in_memory_ticket_repository::InMemoryTicketRepository;
pub use postgres_assignment_outbox::PostgresAssignmentOutbox;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_directory_repository::PostgresDirectoryRepository;
pub use postgres_grant_repository::PostgresGrantRepository;
pub use postgres_sla_policy_repository::PostgresSlaPolicyRepository;
pub use postgres_ticket_repository::PostgresTicketRepository;
