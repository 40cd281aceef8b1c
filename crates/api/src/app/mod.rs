//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection and service construction
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses
//!
//! Protected requests pass through authentication, then the denial audit
//! bridge, then each route's guards.

use std::sync::Arc;

use axum::{middleware::from_fn_with_state, routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::{denial_audit, middleware};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: Arc<AppServices>) -> Router {
    let auth_state = middleware::AuthState {
        codec: Arc::clone(&services.codec),
    };

    let protected = routes::router().layer(
        ServiceBuilder::new()
            .layer(from_fn_with_state(auth_state, middleware::auth_middleware))
            .layer(from_fn_with_state(services.audit.clone(), denial_audit::audit_denials)),
    );

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::public_router())
        .merge(protected)
        .layer(Extension(services))
}
