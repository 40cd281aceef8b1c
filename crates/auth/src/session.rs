//! Login and refresh: the two places credentials are minted.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;

use hrdesk_core::{EmployeeId, UserId};

use crate::{
    Credential, CredentialCodec, CredentialError, DirectoryError, PasswordHasher, Role, TokenUse,
    UserDirectory,
};

/// Lifetimes of the two credentials issued together.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TokenPolicy {
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::days(7),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Error)]
pub enum SessionError {
    /// Unknown email, wrong password, inactive account, or no employee record.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Refresh token failed verification, or its subject is gone or inactive.
    #[error("invalid refresh token")]
    InvalidToken,

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Issue(#[from] CredentialError),
}

#[derive(Clone)]
pub struct SessionService {
    directory: Arc<dyn UserDirectory>,
    codec: Arc<CredentialCodec>,
    hasher: PasswordHasher,
    policy: TokenPolicy,
}

impl SessionService {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        codec: Arc<CredentialCodec>,
        policy: TokenPolicy,
    ) -> Self {
        Self {
            directory,
            codec,
            hasher: PasswordHasher::new(),
            policy,
        }
    }

    pub fn policy(&self) -> TokenPolicy {
        self.policy
    }

    /// Authenticate with email and password and issue an access/refresh pair.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, SessionError> {
        let Some(account) = self.directory.find_by_email(email).await? else {
            tracing::debug!("login rejected: unknown email");
            return Err(SessionError::InvalidCredentials);
        };

        match self.hasher.verify_password(password, &account.password_hash) {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(user_id = %account.id, "login rejected: wrong password");
                return Err(SessionError::InvalidCredentials);
            }
            Err(e) => {
                tracing::warn!(user_id = %account.id, error = %e, "login rejected: unusable password hash");
                return Err(SessionError::InvalidCredentials);
            }
        }

        if !account.is_active {
            tracing::debug!(user_id = %account.id, "login rejected: account inactive");
            return Err(SessionError::InvalidCredentials);
        }

        let Some(employee_id) = account.employee_id else {
            tracing::debug!(user_id = %account.id, "login rejected: no employee record");
            return Err(SessionError::InvalidCredentials);
        };

        let pair = self.issue_pair(account.id, employee_id, account.role, now)?;
        tracing::info!(user_id = %account.id, role = %account.role, "login succeeded");
        Ok(pair)
    }

    /// Exchange a refresh credential for a fresh pair.
    ///
    /// The subject's active flag and role are re-read from the directory, so
    /// deactivation and role changes take effect here. Outstanding access
    /// credentials keep their snapshot until they expire.
    pub async fn refresh(&self, refresh_token: &str, now: DateTime<Utc>) -> Result<TokenPair, SessionError> {
        let credential = self.codec.decode(refresh_token, now).map_err(|e| {
            tracing::debug!(error = %e, "refresh rejected: credential did not verify");
            SessionError::InvalidToken
        })?;

        if credential.token_use != TokenUse::Refresh {
            tracing::debug!(user_id = %credential.subject, "refresh rejected: not a refresh credential");
            return Err(SessionError::InvalidToken);
        }

        let account = match self.directory.find_by_id(credential.subject).await? {
            Some(account) if account.is_active => account,
            _ => {
                tracing::debug!(user_id = %credential.subject, "refresh rejected: subject missing or inactive");
                return Err(SessionError::InvalidToken);
            }
        };

        let Some(employee_id) = credential.employee_id.or(account.employee_id) else {
            tracing::debug!(user_id = %account.id, "refresh rejected: no employee record");
            return Err(SessionError::InvalidToken);
        };

        self.issue_pair(account.id, employee_id, account.role, now)
    }

    fn issue_pair(
        &self,
        subject: UserId,
        employee_id: EmployeeId,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, SessionError> {
        let access = Credential::issue(subject, Some(employee_id), role, TokenUse::Access, now, self.policy.access_ttl);
        let refresh = Credential::issue(subject, Some(employee_id), role, TokenUse::Refresh, now, self.policy.refresh_ttl);

        Ok(TokenPair {
            access_token: self.codec.encode(&access)?,
            refresh_token: self.codec.encode(&refresh)?,
        })
    }
}

impl core::fmt::Debug for SessionService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionService")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
