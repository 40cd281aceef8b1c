use std::sync::Arc;

use axum::{extract::Extension, routing::post, Json, Router};
use serde_json::{json, Value};
use uuid::Uuid;

use hrdesk_audit::actions;
use hrdesk_auth::{IdentityContext, Permission};

use crate::app::services::AppServices;
use crate::authz::{guarded, require_permissions};

pub fn router() -> Router {
    let clock = || [require_permissions([Permission::ClockAttendance])];
    Router::new()
        .route("/api/attendance/clock-in", guarded(post(clock_in), clock()))
        .route("/api/attendance/clock-out", guarded(post(clock_out), clock()))
}

pub async fn clock_in(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
) -> Json<Value> {
    record(&services, &identity, actions::CLOCK_IN)
}

pub async fn clock_out(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
) -> Json<Value> {
    record(&services, &identity, actions::CLOCK_OUT)
}

fn record(services: &AppServices, identity: &IdentityContext, action: &str) -> Json<Value> {
    let id = Uuid::now_v7();
    services.audit.record(
        Some(identity.subject()),
        action,
        actions::entities::ATTENDANCE,
        Some(id),
        None,
    );
    Json(json!({ "id": id }))
}
