//! Postgres-backed audit store.
//!
//! Rows live in `audit_logs` (see [`crate::schema`]). The store only ever
//! inserts and selects.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::instrument;
use uuid::Uuid;

use hrdesk_audit::{AuditEntry, AuditFilter, AuditStore, AuditStoreError, NewAuditEntry};
use hrdesk_core::{AuditEntryId, UserId};

#[derive(Debug, Clone)]
pub struct PostgresAuditStore {
    pool: Arc<PgPool>,
}

impl PostgresAuditStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl AuditStore for PostgresAuditStore {
    #[instrument(
        skip(self, entry),
        fields(action = entry.action(), entity = entry.entity_type()),
        err
    )]
    async fn append(&self, entry: NewAuditEntry) -> Result<AuditEntry, AuditStoreError> {
        let stored = entry.into_entry(AuditEntryId::new(), Utc::now());

        sqlx::query(
            r#"
            INSERT INTO audit_logs (id, user_id, action, entity, entity_id, metadata, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(*stored.id.as_uuid())
        .bind(stored.actor.map(|a| *a.as_uuid()))
        .bind(&stored.action)
        .bind(&stored.entity_type)
        .bind(stored.entity_id)
        .bind(&stored.metadata)
        .bind(stored.created_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("append", e))?;

        Ok(stored)
    }

    #[instrument(skip(self), err)]
    async fn list(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>, AuditStoreError> {
        let mut query: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "SELECT id, user_id, action, entity, entity_id, metadata, created_at FROM audit_logs WHERE TRUE",
        );

        if let Some(from) = filter.from {
            query.push(" AND created_at >= ").push_bind(from);
        }
        if let Some(to) = filter.to {
            query.push(" AND created_at <= ").push_bind(to);
        }
        if let Some(actor) = filter.actor {
            query.push(" AND user_id = ").push_bind(*actor.as_uuid());
        }
        if let Some(action) = &filter.action {
            query.push(" AND action = ").push_bind(action.clone());
        }

        let limit = i64::try_from(filter.limit).unwrap_or(i64::MAX);
        query
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(limit);

        let rows = query
            .build()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list", e))?;

        rows.iter()
            .map(|row| {
                entry_from_row(row).map_err(|e| AuditStoreError::Corrupt(format!("failed to read audit row: {e}")))
            })
            .collect()
    }
}

fn entry_from_row(row: &sqlx::postgres::PgRow) -> Result<AuditEntry, sqlx::Error> {
    let id: Uuid = row.try_get("id")?;
    let actor: Option<Uuid> = row.try_get("user_id")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    Ok(AuditEntry {
        id: AuditEntryId::from_uuid(id),
        actor: actor.map(UserId::from_uuid),
        action: row.try_get("action")?,
        entity_type: row.try_get("entity")?,
        entity_id: row.try_get("entity_id")?,
        metadata: row.try_get("metadata")?,
        created_at,
    })
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> AuditStoreError {
    match err {
        sqlx::Error::Database(db_err) => AuditStoreError::Unavailable(format!(
            "database error in {operation}: {}",
            db_err.message()
        )),
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            AuditStoreError::Corrupt(format!("decode error in {operation}: {err}"))
        }
        _ => AuditStoreError::Unavailable(format!("sqlx error in {operation}: {err}")),
    }
}
