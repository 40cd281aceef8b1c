use async_trait::async_trait;
use thiserror::Error;

use crate::{AuditEntry, AuditFilter, NewAuditEntry};

#[derive(Debug, Error)]
pub enum AuditStoreError {
    #[error("audit store unavailable: {0}")]
    Unavailable(String),

    #[error("stored audit entry is invalid: {0}")]
    Corrupt(String),
}

/// Append-only persistence for audit entries.
///
/// Implementations assign the entry id and creation timestamp on append and
/// must never update or delete an appended entry.
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn append(&self, entry: NewAuditEntry) -> Result<AuditEntry, AuditStoreError>;

    /// Entries matching `filter`, newest first, at most `filter.limit`.
    async fn list(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>, AuditStoreError>;
}

#[async_trait]
impl<S> AuditStore for std::sync::Arc<S>
where
    S: AuditStore + ?Sized,
{
    async fn append(&self, entry: NewAuditEntry) -> Result<AuditEntry, AuditStoreError> {
        (**self).append(entry).await
    }

    async fn list(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>, AuditStoreError> {
        (**self).list(filter).await
    }
}
