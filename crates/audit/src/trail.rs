//! The audit service used by request handlers and middleware.

use std::sync::Arc;

use serde_json::Value;
use tokio::runtime::Handle;
use uuid::Uuid;

use hrdesk_core::UserId;

use crate::{AuditEntry, AuditQuery, AuditStore, AuditStoreError, NewAuditEntry};

pub const DEFAULT_LIMIT: usize = 50;

/// Handle to the audit trail. Cheap to clone.
#[derive(Clone)]
pub struct AuditTrail {
    store: Arc<dyn AuditStore>,
    default_limit: usize,
}

impl AuditTrail {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self {
            store,
            default_limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit.max(1);
        self
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    /// Record an entry without waiting for it to be stored.
    ///
    /// Never fails and never blocks the caller: the append runs on a spawned
    /// task and any failure is logged and dropped.
    pub fn record(
        &self,
        actor: Option<UserId>,
        action: &str,
        entity_type: &str,
        entity_id: Option<Uuid>,
        metadata: Option<Value>,
    ) {
        let entry = match NewAuditEntry::new(actor, action, entity_type, entity_id, metadata) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(action, entity_type, error = %e, "audit entry rejected");
                return;
            }
        };

        let Ok(handle) = Handle::try_current() else {
            tracing::warn!(action, entity_type, "no async runtime; audit entry dropped");
            return;
        };

        let store = Arc::clone(&self.store);
        handle.spawn(async move {
            let action = entry.action().to_string();
            let entity_type = entry.entity_type().to_string();
            if let Err(e) = store.append(entry).await {
                tracing::warn!(%action, %entity_type, error = %e, "audit append failed");
            }
        });
    }

    /// Append and wait for the stored entry.
    pub async fn append(&self, entry: NewAuditEntry) -> Result<AuditEntry, AuditStoreError> {
        self.store.append(entry).await
    }

    /// Entries matching `query`, newest first.
    pub async fn list_filtered(&self, query: &AuditQuery) -> Result<Vec<AuditEntry>, AuditStoreError> {
        let filter = query.resolve(self.default_limit);
        self.store.list(&filter).await
    }
}

impl core::fmt::Debug for AuditTrail {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuditTrail")
            .field("default_limit", &self.default_limit)
            .finish_non_exhaustive()
    }
}
