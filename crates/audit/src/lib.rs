//! `hrdesk-audit` — the append-only audit trail.
//!
//! Entries are written through the [`AuditStore`] port; [`AuditTrail`] is the
//! service handlers and middleware talk to.

pub mod actions;
pub mod entry;
pub mod filter;
pub mod store;
pub mod trail;

pub use entry::{AuditEntry, NewAuditEntry};
pub use filter::{AuditFilter, AuditQuery, MAX_LIMIT};
pub use store::{AuditStore, AuditStoreError};
pub use trail::{AuditTrail, DEFAULT_LIMIT};
