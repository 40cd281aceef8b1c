use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};

use hrdesk_audit::actions;
use hrdesk_auth::{IdentityContext, Permission};

use crate::app::routes::common::{body_object, pick};
use crate::app::services::AppServices;
use crate::authz::{guarded, require_permissions};

pub fn router() -> Router {
    Router::new()
        .route(
            "/api/profile",
            guarded(get(show), [require_permissions([Permission::ViewProfile])]),
        )
        .route(
            "/api/profile",
            guarded(
                put(update),
                [
                    require_permissions([Permission::ViewProfile]),
                    require_permissions([Permission::UpdateProfile]),
                ],
            ),
        )
}

pub async fn show(Extension(identity): Extension<IdentityContext>) -> Json<Value> {
    Json(json!({
        "user_id": identity.subject(),
        "employee_id": identity.employee_id(),
        "role": identity.role(),
    }))
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    body: Option<Json<Value>>,
) -> Json<Value> {
    let body = body_object(body);

    services.audit.record(
        Some(identity.subject()),
        actions::PROFILE_UPDATED,
        actions::entities::EMPLOYEE,
        identity.employee_id().map(|e| *e.as_uuid()),
        Some(pick(&body, &["phone", "address"])),
    );

    Json(json!({ "employee_id": identity.employee_id() }))
}
