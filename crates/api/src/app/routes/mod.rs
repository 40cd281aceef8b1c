use axum::{routing::post, Router};

pub mod admin;
pub mod analytics;
pub mod attendance;
pub mod audit_logs;
pub mod auth;
pub mod common;
pub mod departments;
pub mod employees;
pub mod leaves;
pub mod notifications;
pub mod payslips;
pub mod profile;
pub mod reports;
pub mod system;

/// Endpoints reachable without a credential.
pub fn public_router() -> Router {
    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh))
}

/// Endpoints behind the authentication stage. Guards are attached per route.
pub fn router() -> Router {
    Router::new()
        .merge(auth::router())
        .merge(admin::router())
        .merge(audit_logs::router())
        .merge(employees::router())
        .merge(departments::router())
        .merge(profile::router())
        .merge(attendance::router())
        .merge(analytics::router())
        .merge(reports::router())
        .merge(leaves::router())
        .merge(notifications::router())
        .merge(payslips::router())
}
