use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use hrdesk_audit::{AuditEntry, AuditFilter, AuditStore, AuditStoreError, NewAuditEntry};
use hrdesk_core::AuditEntryId;

/// In-memory append-only audit store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryAuditStore {
    entries: RwLock<Vec<AuditEntry>>,
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored entry in append order.
    pub fn snapshot(&self) -> Vec<AuditEntry> {
        match self.entries.read() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AuditStore for InMemoryAuditStore {
    async fn append(&self, entry: NewAuditEntry) -> Result<AuditEntry, AuditStoreError> {
        let stored = entry.into_entry(AuditEntryId::new(), Utc::now());

        let mut entries = self
            .entries
            .write()
            .map_err(|_| AuditStoreError::Unavailable("lock poisoned".to_string()))?;
        entries.push(stored.clone());

        Ok(stored)
    }

    async fn list(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>, AuditStoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| AuditStoreError::Unavailable("lock poisoned".to_string()))?;

        // Reverse append order first so equal timestamps stay newest first
        // through the stable sort.
        let mut matched: Vec<AuditEntry> = entries
            .iter()
            .rev()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched.truncate(filter.limit);

        Ok(matched)
    }
}
