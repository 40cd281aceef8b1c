use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use hrdesk_core::{EmployeeId, UserId};

use crate::{catalog, CredentialError, PermissionSet, Role};

/// Which half of a login pair a credential is.
///
/// Access credentials authenticate requests; refresh credentials may only be
/// exchanged for a new pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenUse {
    Access,
    Refresh,
}

/// Claims exactly as they travel inside the signed token.
///
/// Only `user_id`, `token_use`, `iat` and `exp` are structurally required.
/// The other claims are read leniently: a wrong type degrades to empty, and
/// empty claims are resolved later (role to no permissions, permissions to
/// the catalog).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub user_id: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub role: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub employee_id: String,

    #[serde(
        default,
        deserialize_with = "lenient_strings",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub permissions: Vec<String>,

    pub token_use: TokenUse,

    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,

    /// Expiration, seconds since the Unix epoch.
    pub exp: i64,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.is_empty() => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// A verified (or freshly issued) session credential.
///
/// Immutable once built. `permissions` is the catalog snapshot taken at
/// issuance; it does not follow later catalog changes. It is `None` when the
/// token carried no permission names at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub subject: UserId,
    pub employee_id: Option<EmployeeId>,
    pub role: Option<Role>,
    pub permissions: Option<PermissionSet>,
    pub token_use: TokenUse,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    /// Issue a credential for `subject` acting as `role`.
    ///
    /// Timestamps are truncated to whole seconds, the resolution of the
    /// `iat`/`exp` claims.
    pub fn issue(
        subject: UserId,
        employee_id: Option<EmployeeId>,
        role: Role,
        token_use: TokenUse,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let issued_at = whole_seconds(now);
        Self {
            subject,
            employee_id,
            role: Some(role),
            permissions: Some(catalog::permissions_for_role(role)),
            token_use,
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn to_claims(&self) -> TokenClaims {
        TokenClaims {
            user_id: self.subject.to_string(),
            role: self.role.map(|r| r.as_str().to_string()).unwrap_or_default(),
            employee_id: self.employee_id.map(|e| e.to_string()).unwrap_or_default(),
            permissions: self.permissions.as_ref().map(PermissionSet::to_tags).unwrap_or_default(),
            token_use: self.token_use,
            iat: self.issued_at.timestamp(),
            exp: self.expires_at.timestamp(),
        }
    }
}

impl TryFrom<TokenClaims> for Credential {
    type Error = CredentialError;

    fn try_from(claims: TokenClaims) -> Result<Self, Self::Error> {
        let subject = claims
            .user_id
            .parse::<UserId>()
            .map_err(|_| CredentialError::Malformed)?;

        let employee_id = match claims.employee_id.as_str() {
            "" => None,
            raw => Some(raw.parse::<EmployeeId>().map_err(|_| CredentialError::Malformed)?),
        };

        let issued_at = DateTime::from_timestamp(claims.iat, 0).ok_or(CredentialError::Malformed)?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or(CredentialError::Malformed)?;
        if expires_at <= issued_at {
            return Err(CredentialError::Malformed);
        }

        Ok(Self {
            subject,
            employee_id,
            role: Role::parse(&claims.role),
            // A non-empty claim is taken as-is, even if none of its names are known.
            permissions: (!claims.permissions.is_empty()).then(|| PermissionSet::from_tags(&claims.permissions)),
            token_use: claims.token_use,
            issued_at,
            expires_at,
        })
    }
}

/// Check a credential's validity window at `now`.
///
/// A credential is valid while `now < expires_at`.
pub fn validate_window(credential: &Credential, now: DateTime<Utc>) -> Result<(), CredentialError> {
    if credential.is_expired_at(now) {
        return Err(CredentialError::Expired);
    }
    Ok(())
}

fn whole_seconds(at: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp(at.timestamp(), 0).unwrap_or(at)
}
