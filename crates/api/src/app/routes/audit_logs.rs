use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;

use hrdesk_audit::AuditQuery;
use hrdesk_auth::Permission;
use hrdesk_core::UserId;

use crate::app::{dto::AuditLogParams, errors, services::AppServices};
use crate::authz::{guarded, require_permissions};

pub fn router() -> Router {
    Router::new().route(
        "/api/audit-logs",
        guarded(get(list), [require_permissions([Permission::ViewAuditLogs])]),
    )
}

/// GET /api/audit-logs?limit&from&to&user_id&action
pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<AuditLogParams>,
) -> Response {
    let query = match audit_query(params) {
        Ok(query) => query,
        Err(res) => return res,
    };

    match services.audit.list_filtered(&query).await {
        Ok(entries) => Json(entries).into_response(),
        Err(e) => errors::audit_error_to_response(e),
    }
}

/// Unparseable limits and dates are ignored; an unparseable `user_id` is a
/// client error.
fn audit_query(params: AuditLogParams) -> Result<AuditQuery, Response> {
    let actor = match params.user_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            raw.parse::<UserId>()
                .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid user_id"))?,
        ),
        None => None,
    };

    Ok(AuditQuery {
        limit: params.limit.as_deref().and_then(|s| s.trim().parse::<i64>().ok()),
        from: params.from.as_deref().and_then(parse_day),
        to: params.to.as_deref().and_then(parse_day),
        actor,
        action: params.action.filter(|a| !a.is_empty()),
    })
}

fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}
