//! Role authorization layer. Reads the identity's effective role; writes nothing.
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::context::RequestContext;
use crate::error::GuardError;
use crate::services::roles::RoleRequirement;

pub async fn role_middleware(
    State(requirement): State<Arc<RoleRequirement>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardError> {
    let identity = req
        .extensions()
        .get::<RequestContext>()
        .and_then(|ctx| ctx.identity.as_ref())
        .ok_or(GuardError::MissingContext("identity"))?;

    if let Err(err) = requirement.check(&identity.effective_role) {
        tracing::info!(
            user_id = %identity.user_id,
            role = %identity.effective_role,
            required = %requirement.describe(),
            "authorization denied"
        );
        return Err(err);
    }

    Ok(next.run(req).await)
}
