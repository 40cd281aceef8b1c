use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;

use hrdesk_auth::IdentityContext;

use crate::app::{
    dto::{LoginRequest, RefreshRequest},
    errors,
    services::AppServices,
};

/// Authenticated auth endpoints; login and refresh are public.
pub fn router() -> Router {
    Router::new().route("/api/auth/me", get(me))
}

/// POST /api/auth/login
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_error(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    match services.sessions.login(&body.email, &body.password, Utc::now()).await {
        Ok(pair) => Json(pair).into_response(),
        Err(e) => errors::session_error_to_response(e, "invalid credentials"),
    }
}

/// POST /api/auth/refresh
pub async fn refresh(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<RefreshRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_error(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    match services.sessions.refresh(&body.refresh_token, Utc::now()).await {
        Ok(pair) => Json(pair).into_response(),
        Err(e) => errors::session_error_to_response(e, "invalid refresh token"),
    }
}

/// GET /api/auth/me
pub async fn me(Extension(identity): Extension<IdentityContext>) -> Json<IdentityContext> {
    Json(identity)
}
