use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use hrdesk_audit::actions;
use hrdesk_auth::{IdentityContext, Permission, Requirement};

use crate::app::{
    errors,
    routes::common::{body_object, empty_list, parse_id, pick},
    services::AppServices,
};
use crate::authz::{guarded, require_permissions};

fn own() -> Vec<Requirement> {
    vec![require_permissions([Permission::ViewOwnPayslips])]
}

fn manage() -> Vec<Requirement> {
    let mut guards = own();
    guards.push(require_permissions([Permission::ManagePayslips]));
    guards
}

pub fn router() -> Router {
    Router::new()
        .route("/api/payslips/mine", guarded(get(mine), own()))
        .route("/api/payslips/:id", guarded(get(show), own()))
        .route("/api/payslips/:id/pdf", guarded(get(pdf), own()))
        .route("/api/payslips", guarded(get(list), manage()))
        .route("/api/payslips", guarded(post(generate), manage()))
}

pub async fn mine() -> Response {
    empty_list()
}

pub async fn show(path: Path<String>) -> Response {
    match parse_id(path, "payslip") {
        Ok(_) => errors::json_error(StatusCode::NOT_FOUND, "payslip not found"),
        Err(res) => res,
    }
}

pub async fn pdf(path: Path<String>) -> Response {
    match parse_id(path, "payslip") {
        Ok(_) => errors::json_error(StatusCode::NOT_IMPLEMENTED, "payslip rendering is not available"),
        Err(res) => res,
    }
}

pub async fn list() -> Response {
    empty_list()
}

pub async fn generate(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    body: Option<Json<Value>>,
) -> Response {
    let body = body_object(body);
    let id = Uuid::now_v7();

    services.audit.record(
        Some(identity.subject()),
        actions::PAYSLIP_CREATED,
        actions::entities::PAYSLIP,
        Some(id),
        Some(pick(&body, &["month", "year"])),
    );

    Json(json!({ "id": id })).into_response()
}
