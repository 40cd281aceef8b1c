//! `AuditStore` adapters.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryAuditStore;
pub use postgres::PostgresAuditStore;
