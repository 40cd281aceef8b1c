//! Leave requests.
//!
//! Guards accumulate the way the route groups are layered: every leave route
//! needs `request_leave`, the personal views add `view_own_leaves`, and the
//! review endpoints add `review_leaves` on top.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use hrdesk_audit::actions;
use hrdesk_auth::{IdentityContext, Permission, Requirement};

use crate::app::{
    dto::ReviewLeaveRequest,
    errors,
    routes::common::{body_object, empty_list, parse_id, pick},
    services::AppServices,
};
use crate::authz::{guarded, require_permissions};

fn requester() -> Vec<Requirement> {
    vec![require_permissions([Permission::RequestLeave])]
}

fn own() -> Vec<Requirement> {
    let mut guards = requester();
    guards.push(require_permissions([Permission::ViewOwnLeaves]));
    guards
}

fn reviewer() -> Vec<Requirement> {
    let mut guards = own();
    guards.push(require_permissions([Permission::ReviewLeaves]));
    guards
}

pub fn router() -> Router {
    Router::new()
        .route("/api/leaves", guarded(post(request), requester()))
        .route("/api/leaves", guarded(get(list_all), reviewer()))
        .route("/api/leaves/mine", guarded(get(mine), own()))
        .route("/api/leaves/:id/cancel", guarded(put(cancel), own()))
        .route("/api/leaves/:id/review", guarded(put(review), reviewer()))
}

pub async fn request(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    body: Option<Json<Value>>,
) -> Response {
    let body = body_object(body);
    let id = Uuid::now_v7();

    services.audit.record(
        Some(identity.subject()),
        actions::LEAVE_REQUESTED,
        actions::entities::LEAVE_REQUEST,
        Some(id),
        Some(pick(&body, &["start_date", "end_date"])),
    );

    Json(json!({ "id": id, "status": "pending" })).into_response()
}

pub async fn mine() -> Response {
    empty_list()
}

pub async fn list_all() -> Response {
    empty_list()
}

pub async fn cancel(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    path: Path<String>,
) -> Response {
    let id = match parse_id(path, "leave") {
        Ok(id) => id,
        Err(res) => return res,
    };

    services.audit.record(
        Some(identity.subject()),
        actions::LEAVE_CANCELLED,
        actions::entities::LEAVE_REQUEST,
        Some(id),
        None,
    );

    Json(json!({ "id": id, "status": "cancelled" })).into_response()
}

pub async fn review(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    path: Path<String>,
    body: Result<Json<ReviewLeaveRequest>, JsonRejection>,
) -> Response {
    let id = match parse_id(path, "leave") {
        Ok(id) => id,
        Err(res) => return res,
    };
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_error(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    let (status, action) = match body.status.trim().to_ascii_lowercase().as_str() {
        "approved" => ("approved", actions::LEAVE_APPROVED),
        "rejected" => ("rejected", actions::LEAVE_REJECTED),
        _ => {
            return errors::json_error(StatusCode::BAD_REQUEST, "status must be approved or rejected");
        }
    };

    services.audit.record(
        Some(identity.subject()),
        action,
        actions::entities::LEAVE_REQUEST,
        Some(id),
        None,
    );

    Json(json!({ "id": id, "status": status })).into_response()
}
