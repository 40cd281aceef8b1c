//! Administrative views over the authorization model.

use axum::{routing::get, Json, Router};
use serde_json::{Map, Value};

use hrdesk_auth::{catalog, Role};

use crate::authz::{guarded, require_roles};

pub fn router() -> Router {
    Router::new().route(
        "/api/admin/catalog",
        guarded(get(permission_catalog), [require_roles([Role::Admin])]),
    )
}

/// GET /api/admin/catalog - role to permission table
pub async fn permission_catalog() -> Json<Value> {
    let table: Map<String, Value> = Role::ALL
        .iter()
        .map(|role| {
            let tags = catalog::permissions_for_role(*role).to_tags();
            (role.as_str().to_owned(), Value::from(tags))
        })
        .collect();
    Json(Value::Object(table))
}
