pub mod access;
pub mod health;
pub mod security;
pub mod sla_policies;
pub mod tickets;
