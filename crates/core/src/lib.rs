//! `hrdesk-core` — shared identifiers and the domain error model.
//!
//! This crate has no infrastructure concerns and no knowledge of HTTP.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{AuditEntryId, EmployeeId, UserId};
