//! Records one `AUTHZ_DENIED` audit entry for every request that ends in 403.

use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use serde_json::json;

use hrdesk_audit::{actions, AuditTrail};
use hrdesk_auth::IdentityContext;

/// Must sit inside the authentication stage so the identity is visible,
/// and outside every guard so their 403s pass through it.
pub async fn audit_denials(State(trail): State<AuditTrail>, req: Request<Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());
    let identity = req.extensions().get::<IdentityContext>().cloned();

    let res = next.run(req).await;

    if res.status() == StatusCode::FORBIDDEN {
        let role = identity.as_ref().map(|i| i.role_tag()).unwrap_or("");
        trail.record(
            identity.as_ref().map(|i| i.subject()),
            actions::AUTHZ_DENIED,
            actions::entities::ROUTE,
            None,
            Some(json!({
                "path": path,
                "method": method,
                "role": role,
            })),
        );
    }

    res
}
