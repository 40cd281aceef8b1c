use axum::{response::Response, routing::get, Router};

use hrdesk_auth::Permission;

use crate::app::routes::common::empty_list;
use crate::authz::{guarded, require_permissions};

pub fn router() -> Router {
    Router::new().route(
        "/api/notifications",
        guarded(get(list), [require_permissions([Permission::ViewNotifications])]),
    )
}

pub async fn list() -> Response {
    empty_list()
}
