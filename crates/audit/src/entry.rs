use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use hrdesk_core::{AuditEntryId, DomainError, DomainResult, UserId};

/// Longest accepted action or entity tag.
pub const MAX_TAG_LEN: usize = 100;

/// A persisted audit record.
///
/// Entries are append-only: once a store returns one it is never updated or
/// deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: AuditEntryId,
    /// Acting subject; `None` for anonymous or unidentified requests.
    pub actor: Option<UserId>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<Uuid>,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
}

/// An entry that has not been appended yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditEntry {
    actor: Option<UserId>,
    action: String,
    entity_type: String,
    entity_id: Option<Uuid>,
    metadata: Value,
}

impl NewAuditEntry {
    /// Validate and build an entry. Missing metadata becomes `{}`.
    pub fn new(
        actor: Option<UserId>,
        action: impl Into<String>,
        entity_type: impl Into<String>,
        entity_id: Option<Uuid>,
        metadata: Option<Value>,
    ) -> DomainResult<Self> {
        let action = action.into();
        let entity_type = entity_type.into();
        check_tag("action", &action)?;
        check_tag("entity_type", &entity_type)?;

        Ok(Self {
            actor,
            action,
            entity_type,
            entity_id,
            metadata: match metadata {
                None | Some(Value::Null) => Value::Object(Map::new()),
                Some(v) => v,
            },
        })
    }

    pub fn actor(&self) -> Option<UserId> {
        self.actor
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn entity_id(&self) -> Option<Uuid> {
        self.entity_id
    }

    pub fn metadata(&self) -> &Value {
        &self.metadata
    }

    /// Seal the entry with the identity and timestamp a store assigns.
    pub fn into_entry(self, id: AuditEntryId, created_at: DateTime<Utc>) -> AuditEntry {
        AuditEntry {
            id,
            actor: self.actor,
            action: self.action,
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            metadata: self.metadata,
            created_at,
        }
    }
}

fn check_tag(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    if value.len() > MAX_TAG_LEN {
        return Err(DomainError::validation(format!(
            "{field} cannot exceed {MAX_TAG_LEN} bytes"
        )));
    }
    Ok(())
}
