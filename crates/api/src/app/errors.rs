use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use hrdesk_audit::AuditStoreError;
use hrdesk_auth::{Denial, DirectoryError, SessionError};

/// `{"error": <message>}` with the given status.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, axum::Json(json!({ "error": message.into() }))).into_response()
}

pub fn unauthorized(message: &'static str) -> Response {
    json_error(StatusCode::UNAUTHORIZED, message)
}

/// The 403 body every authorization guard produces.
pub fn forbidden(denial: &Denial) -> Response {
    (
        StatusCode::FORBIDDEN,
        axum::Json(json!({
            "error": "forbidden",
            "code": "FORBIDDEN",
            "required_roles": denial.required_roles,
            "required_permissions": denial.required_permissions,
        })),
    )
        .into_response()
}

pub fn session_error_to_response(err: SessionError, rejected: &'static str) -> Response {
    match err {
        SessionError::InvalidCredentials | SessionError::InvalidToken => unauthorized(rejected),
        SessionError::Directory(e) => {
            tracing::error!(error = %e, "identity store failure");
            json_error(StatusCode::SERVICE_UNAVAILABLE, "identity store unavailable")
        }
        SessionError::Issue(e) => {
            tracing::error!(error = %e, "failed to issue credentials");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "failed to issue credentials")
        }
    }
}

pub fn directory_error_to_response(err: DirectoryError) -> Response {
    tracing::error!(error = %err, "identity store failure");
    json_error(StatusCode::SERVICE_UNAVAILABLE, "identity store unavailable")
}

pub fn audit_error_to_response(err: AuditStoreError) -> Response {
    tracing::error!(error = %err, "audit store failure");
    match err {
        AuditStoreError::Unavailable(_) => json_error(StatusCode::SERVICE_UNAVAILABLE, "audit store unavailable"),
        AuditStoreError::Corrupt(_) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "audit store returned invalid data"),
    }
}
