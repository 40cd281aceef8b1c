use std::sync::Arc;

use axum::{
    extract::Extension,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use hrdesk_audit::actions;
use hrdesk_auth::{IdentityContext, Permission};

use crate::app::routes::common::{body_object, empty_list, pick};
use crate::app::services::AppServices;
use crate::authz::{guarded, require_permissions};

pub fn router() -> Router {
    Router::new()
        .route(
            "/api/departments",
            guarded(post(create), [require_permissions([Permission::ManageDepartments])]),
        )
        .route(
            "/api/departments",
            guarded(get(list), [require_permissions([Permission::ViewDepartments])]),
        )
}

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    body: Option<Json<Value>>,
) -> Response {
    let body = body_object(body);
    let id = Uuid::now_v7();

    services.audit.record(
        Some(identity.subject()),
        actions::DEPARTMENT_CREATED,
        actions::entities::DEPARTMENT,
        Some(id),
        Some(pick(&body, &["name"])),
    );

    Json(json!({ "id": id })).into_response()
}

pub async fn list() -> Response {
    empty_list()
}
