//! Service wiring: stores, codec, session and audit services.
//!
//! With `DATABASE_URL` set the Postgres adapters are used; otherwise
//! everything lives in memory (dev/tests).

use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;

use hrdesk_audit::{AuditStore, AuditTrail};
use hrdesk_auth::{
    CredentialCodec, DirectoryError, PasswordError, PasswordHasher, Role, SessionService, TokenPolicy,
    UserAccount, UserDirectory,
};
use hrdesk_core::{EmployeeId, UserId};
use hrdesk_infra::{
    schema, InMemoryAuditStore, InMemoryUserDirectory, PostgresAuditStore, PostgresUserDirectory,
};

use crate::config::{AdminSeed, ApiConfig};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("identity store: {0}")]
    Directory(#[from] DirectoryError),

    #[error("password hashing: {0}")]
    Password(#[from] PasswordError),
}

/// Everything request handlers need, shared behind an `Arc`.
#[derive(Clone)]
pub struct AppServices {
    pub codec: Arc<CredentialCodec>,
    pub sessions: SessionService,
    pub directory: Arc<dyn UserDirectory>,
    pub audit: AuditTrail,
}

impl AppServices {
    pub fn new(
        jwt_secret: &[u8],
        directory: Arc<dyn UserDirectory>,
        audit_store: Arc<dyn AuditStore>,
        policy: TokenPolicy,
        audit_default_limit: usize,
    ) -> Self {
        let codec = Arc::new(CredentialCodec::new(jwt_secret));
        Self {
            sessions: SessionService::new(Arc::clone(&directory), Arc::clone(&codec), policy),
            directory,
            audit: AuditTrail::new(audit_store).with_default_limit(audit_default_limit),
            codec,
        }
    }
}

impl core::fmt::Debug for AppServices {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppServices")
            .field("codec", &self.codec)
            .field("sessions", &self.sessions)
            .field("audit", &self.audit)
            .finish_non_exhaustive()
    }
}

pub async fn build_services(config: &ApiConfig) -> Result<Arc<AppServices>, StartupError> {
    let (directory, audit_store): (Arc<dyn UserDirectory>, Arc<dyn AuditStore>) = match &config.database_url {
        Some(url) => {
            let pool = PgPool::connect(url).await?;
            schema::ensure_schema(&pool).await?;

            let directory = PostgresUserDirectory::new(pool.clone());
            if let Some(seed) = &config.admin_seed {
                let hash = PasswordHasher::new().hash_password(&seed.password)?;
                let id = directory.ensure_admin(&seed.email, &hash).await?;
                tracing::info!(user_id = %id, email = %seed.email, "admin account ready");
            }

            tracing::info!("using postgres stores");
            let directory: Arc<dyn UserDirectory> = Arc::new(directory);
            let audit_store: Arc<dyn AuditStore> = Arc::new(PostgresAuditStore::new(pool));
            (directory, audit_store)
        }
        None => {
            let directory = InMemoryUserDirectory::new();
            if let Some(seed) = &config.admin_seed {
                seed_in_memory_admin(&directory, seed)?;
            }

            tracing::warn!("DATABASE_URL not set; using in-memory stores");
            let directory: Arc<dyn UserDirectory> = Arc::new(directory);
            let audit_store: Arc<dyn AuditStore> = Arc::new(InMemoryAuditStore::new());
            (directory, audit_store)
        }
    };

    Ok(Arc::new(AppServices::new(
        config.jwt_secret.as_bytes(),
        directory,
        audit_store,
        config.token_policy,
        config.audit_default_limit,
    )))
}

fn seed_in_memory_admin(directory: &InMemoryUserDirectory, seed: &AdminSeed) -> Result<(), StartupError> {
    let account = UserAccount {
        id: UserId::new(),
        email: seed.email.clone(),
        password_hash: PasswordHasher::new().hash_password(&seed.password)?,
        role: Role::Admin,
        is_active: true,
        employee_id: Some(EmployeeId::new()),
    };
    tracing::info!(user_id = %account.id, email = %account.email, "admin account ready");
    directory.upsert(account)?;
    Ok(())
}
