//! Process configuration read from the environment.

use std::env;
use std::net::{IpAddr, SocketAddr};

use chrono::Duration;
use thiserror::Error;

use hrdesk_auth::TokenPolicy;

const DEV_JWT_SECRET: &str = "hrdesk-dev-secret-do-not-use";
const MIN_SECRET_LEN: usize = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("invalid {name} value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Initial admin account created at startup when both seed variables are set.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeed")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct ApiConfig {
    pub jwt_secret: String,
    pub api_host: IpAddr,
    pub api_port: u16,
    pub database_url: Option<String>,
    pub token_policy: TokenPolicy,
    pub audit_default_limit: usize,
    pub admin_seed: Option<AdminSeed>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_host", &self.api_host)
            .field("api_port", &self.api_port)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("token_policy", &self.token_policy)
            .field("audit_default_limit", &self.audit_default_limit)
            .field("admin_seed", &self.admin_seed)
            .finish_non_exhaustive()
    }
}

impl ApiConfig {
    /// Load from the process environment, after applying any `.env` file.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let jwt_secret = match var("JWT_SECRET") {
            Some(secret) => secret,
            None if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set; using insecure dev default");
                DEV_JWT_SECRET.to_owned()
            }
            None => return Err(ConfigError::Missing("JWT_SECRET")),
        };
        if jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid {
                name: "JWT_SECRET",
                value: "<redacted>".to_owned(),
                reason: format!("must be at least {MIN_SECRET_LEN} bytes"),
            });
        }

        let api_host = parse_or("API_HOST", var("API_HOST"), IpAddr::from([0, 0, 0, 0]))?;
        let api_port = parse_or("API_PORT", var("API_PORT"), 8080u16)?;

        let access_ttl = parse_or("ACCESS_TOKEN_TTL_SECS", var("ACCESS_TOKEN_TTL_SECS"), 900u32)?;
        let refresh_ttl = parse_or("REFRESH_TOKEN_TTL_SECS", var("REFRESH_TOKEN_TTL_SECS"), 604_800u32)?;
        for (name, value) in [("ACCESS_TOKEN_TTL_SECS", access_ttl), ("REFRESH_TOKEN_TTL_SECS", refresh_ttl)] {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    name,
                    value: value.to_string(),
                    reason: "must be greater than zero".to_owned(),
                });
            }
        }

        let audit_default_limit = parse_or("AUDIT_DEFAULT_LIMIT", var("AUDIT_DEFAULT_LIMIT"), hrdesk_audit::DEFAULT_LIMIT)?;
        if audit_default_limit == 0 || audit_default_limit > hrdesk_audit::MAX_LIMIT {
            return Err(ConfigError::Invalid {
                name: "AUDIT_DEFAULT_LIMIT",
                value: audit_default_limit.to_string(),
                reason: format!("must be between 1 and {}", hrdesk_audit::MAX_LIMIT),
            });
        }

        let admin_seed = match (var("ADMIN_SEED_EMAIL"), var("ADMIN_SEED_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminSeed { email, password }),
            _ => None,
        };

        Ok(Self {
            jwt_secret,
            api_host,
            api_port,
            database_url: var("DATABASE_URL"),
            token_policy: TokenPolicy {
                access_ttl: Duration::seconds(i64::from(access_ttl)),
                refresh_ttl: Duration::seconds(i64::from(refresh_ttl)),
            },
            audit_default_limit,
            admin_seed,
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.api_host, self.api_port)
    }
}

fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value.parse::<T>().map_err(|e| ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value,
        }),
        None => Ok(default),
    }
}
