//! Authorization stage: per-route guards.
//!
//! Guards read the `IdentityContext` placed by the authentication stage and
//! never perform I/O. A denied request gets the standard 403 body and the
//! handler is never invoked.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::{from_fn_with_state, Next},
    response::Response,
    routing::MethodRouter,
};

use hrdesk_auth::{authorize, AuthzError, IdentityContext, Permission, Requirement, Role};

use crate::app::errors::forbidden;

/// Guard that demands every listed permission.
pub fn require_permissions(required: impl IntoIterator<Item = Permission>) -> Requirement {
    Requirement::permissions(required)
}

/// Guard that demands one of the listed roles.
pub fn require_roles(required: impl IntoIterator<Item = Role>) -> Requirement {
    Requirement::roles(required)
}

/// Wrap `route` in guards. Guards run in the order given; the first one that
/// fails decides the response.
pub fn guarded<S>(route: MethodRouter<S>, requirements: impl IntoIterator<Item = Requirement>) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    let requirements: Vec<Requirement> = requirements.into_iter().collect();
    // The last layer applied runs first.
    requirements
        .into_iter()
        .rev()
        .fold(route, |route, requirement| route.route_layer(from_fn_with_state(requirement, enforce)))
}

pub async fn enforce(State(requirement): State<Requirement>, req: Request<Body>, next: Next) -> Response {
    let Some(identity) = req.extensions().get::<IdentityContext>() else {
        tracing::warn!(path = %req.uri().path(), "authorization guard reached without identity");
        return forbidden(&requirement.denial());
    };

    match authorize(identity, &requirement) {
        Ok(()) => next.run(req).await,
        Err(AuthzError::Forbidden(denial)) => {
            tracing::info!(
                user_id = %identity.subject(),
                role = identity.role_tag(),
                method = %req.method(),
                path = %req.uri().path(),
                ?denial,
                "authorization denied"
            );
            forbidden(&denial)
        }
    }
}
