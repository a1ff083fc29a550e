//! Tenant guard layer: header / subdomain / identity / query -> `RequestContext::tenant`.
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
use crate::services::tenant::{TenantRequest, resolve_request_tenant};

pub async fn tenant_middleware(
    State(guard): State<GuardState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, GuardError> {
    let context_tenant = req
        .extensions()
        .get::<RequestContext>()
        .and_then(|ctx| ctx.identity.as_ref())
        .and_then(|identity| identity.tenant_id.clone());

    let outcome = resolve_request_tenant(
        &guard.app,
        TenantRequest {
            headers: req.headers(),
            uri: req.uri(),
            context_tenant: context_tenant.as_deref(),
        },
    )
    .await;

    if let Some(tenant) = guard.mode.settle(outcome)? {
        req.extensions_mut()
            .get_or_insert_default::<RequestContext>()
            .tenant = Some(tenant);
    }

    Ok(next.run(req).await)
}
