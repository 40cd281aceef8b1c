//! Employee administration. Profile records are owned elsewhere; role
//! changes and deactivation go through the identity store because login and
//! refresh depend on them.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use hrdesk_audit::actions;
use hrdesk_auth::{IdentityContext, Permission, Requirement, Role};
use hrdesk_core::EmployeeId;

use crate::app::errors;
use crate::app::routes::common::{body_object, empty_list, parse_id, pick};
use crate::app::services::AppServices;
use crate::authz::{guarded, require_permissions};

fn manage() -> [Requirement; 1] {
    [require_permissions([Permission::ManageEmployees])]
}

pub fn router() -> Router {
    Router::new()
        .route("/api/employees/count", guarded(get(count), manage()))
        .route("/api/employees", guarded(get(list), manage()))
        .route("/api/employees", guarded(post(create), manage()))
        .route("/api/employees/:id", guarded(put(update), manage()))
        .route("/api/employees/:id", guarded(delete(deactivate), manage()))
}

pub async fn count() -> Json<Value> {
    Json(json!({ "count": 0 }))
}

pub async fn list() -> Response {
    empty_list()
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
        actions::EMPLOYEE_CREATED,
        actions::entities::EMPLOYEE,
        Some(id),
        Some(pick(&body, &["email", "role"])),
    );

    Json(json!({ "id": id })).into_response()
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    path: Path<String>,
    body: Option<Json<Value>>,
) -> Response {
    let id = match parse_id(path, "employee") {
        Ok(id) => id,
        Err(res) => return res,
    };
    let employee_id = EmployeeId::from_uuid(id);
    let body = body_object(body);

    let role = match body.get("role") {
        None | Some(Value::Null) => None,
        Some(raw) => match raw.as_str().and_then(Role::parse) {
            Some(role) => Some(role),
            None => return errors::json_error(StatusCode::BAD_REQUEST, "invalid role"),
        },
    };

    let found = match role {
        Some(role) => services.directory.assign_role(employee_id, role).await,
        None => services
            .directory
            .find_by_employee(employee_id)
            .await
            .map(|account| account.is_some()),
    };
    match found {
        Ok(true) => {}
        Ok(false) => return not_found(),
        Err(e) => return errors::directory_error_to_response(e),
    }

    services.audit.record(
        Some(identity.subject()),
        actions::EMPLOYEE_UPDATED,
        actions::entities::EMPLOYEE,
        Some(id),
        Some(pick(&body, &["first_name", "last_name", "role"])),
    );

    Json(json!({ "id": id })).into_response()
}

pub async fn deactivate(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    path: Path<String>,
) -> Response {
    let id = match parse_id(path, "employee") {
        Ok(id) => id,
        Err(res) => return res,
    };

    match services.directory.deactivate_employee(EmployeeId::from_uuid(id)).await {
        Ok(true) => {}
        Ok(false) => return not_found(),
        Err(e) => return errors::directory_error_to_response(e),
    }
    tracing::info!(employee_id = %id, actor = %identity.subject(), "employee deactivated");

    services.audit.record(
        Some(identity.subject()),
        actions::EMPLOYEE_DEACTIVATED,
        actions::entities::EMPLOYEE,
        Some(id),
        None,
    );

    Json(json!({ "id": id, "is_active": false })).into_response()
}

fn not_found() -> Response {
    errors::json_error(StatusCode::NOT_FOUND, "employee not found")
}
