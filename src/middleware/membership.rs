//! Membership guard layer: identity + tenant -> `RequestContext::membership`.
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::context::RequestContext;
use crate::error::GuardError;
use crate::middleware::GuardState;
use crate::services::membership::check_membership;

pub async fn membership_middleware(
    State(guard): State<GuardState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, GuardError> {
    let ctx = req.extensions().get::<RequestContext>();
    let outcome = check_membership(
        &guard.app,
        ctx.and_then(|c| c.identity.as_ref()),
        ctx.and_then(|c| c.tenant.as_ref()),
    )
    .await;

    if let Some(membership) = guard.mode.settle(outcome)? {
        req.extensions_mut()
            .get_or_insert_default::<RequestContext>()
            .membership = Some(membership);
    }

    Ok(next.run(req).await)
}
