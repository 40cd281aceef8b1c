//! Authentication stage: bearer credential in, `IdentityContext` out.
//!
//! Performs no I/O. Every verification failure is a 401 with a generic
//! reason; the concrete cause is only logged.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use hrdesk_auth::{CredentialCodec, IdentityContext, TokenUse};

use crate::app::errors::unauthorized;

#[derive(Clone)]
pub struct AuthState {
    pub codec: Arc<CredentialCodec>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BearerRejection {
    Missing,
    InvalidHeader,
}

impl BearerRejection {
    fn message(self) -> &'static str {
        match self {
            BearerRejection::Missing => "missing token",
            BearerRejection::InvalidHeader => "invalid authorization header",
        }
    }
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let credential = {
        let token = match extract_bearer(req.headers()) {
            Ok(token) => token,
            Err(rejection) => {
                tracing::debug!(?rejection, "authentication rejected");
                return unauthorized(rejection.message());
            }
        };

        match state.codec.decode(token, Utc::now()) {
            Ok(credential) => credential,
            Err(e) => {
                tracing::debug!(error = %e, "authentication rejected");
                return unauthorized("invalid token");
            }
        }
    };

    if credential.token_use != TokenUse::Access {
        tracing::debug!(user_id = %credential.subject, "authentication rejected: refresh credential used as access");
        return unauthorized("invalid token");
    }

    req.extensions_mut()
        .insert(IdentityContext::from_credential(credential));

    next.run(req).await
}

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// The scheme prefix is case-sensitive.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, BearerRejection> {
    let header = headers
        .get(header::AUTHORIZATION)
        .ok_or(BearerRejection::Missing)?;

    let header = header.to_str().map_err(|_| BearerRejection::InvalidHeader)?;
    if header.is_empty() {
        return Err(BearerRejection::Missing);
    }

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(BearerRejection::InvalidHeader)?
        .trim();

    if token.is_empty() {
        return Err(BearerRejection::InvalidHeader);
    }

    Ok(token)
}
