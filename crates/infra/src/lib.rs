//! Infrastructure layer: storage adapters for the audit trail and the
//! identity store.

pub mod audit;
pub mod directory;
pub mod schema;

pub use audit::{InMemoryAuditStore, PostgresAuditStore};
pub use directory::{InMemoryUserDirectory, PostgresUserDirectory};
