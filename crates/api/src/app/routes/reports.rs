//! Report exports. Rendering is not part of this service, so the guarded
//! endpoints answer 501.

use axum::{http::StatusCode, response::Response, routing::get, Router};

use hrdesk_auth::Permission;

use crate::app::errors::json_error;
use crate::authz::{guarded, require_permissions};

pub fn router() -> Router {
    let export = || [require_permissions([Permission::ExportReports])];
    Router::new()
        .route("/api/reports/attendance/csv", guarded(get(not_rendered), export()))
        .route("/api/reports/attendance/pdf", guarded(get(not_rendered), export()))
}

pub async fn not_rendered() -> Response {
    json_error(StatusCode::NOT_IMPLEMENTED, "report rendering is not available")
}
