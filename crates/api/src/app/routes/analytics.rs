use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use hrdesk_auth::Permission;

use crate::authz::{guarded, require_permissions};

pub fn router() -> Router {
    let view = || [require_permissions([Permission::ViewAnalytics])];
    Router::new()
        .route("/api/analytics/daily-summary", guarded(get(daily_summary), view()))
        .route("/api/analytics/attendance-trend", guarded(get(trend), view()))
        .route("/api/analytics/absentees", guarded(get(absentees), view()))
}

pub async fn daily_summary() -> Json<Value> {
    Json(json!({ "present": 0, "absent": 0, "on_leave": 0 }))
}

pub async fn trend() -> Json<Value> {
    Json(json!([]))
}

pub async fn absentees() -> Json<Value> {
    Json(json!([]))
}
