//! Authentication guard layer: bearer credential -> `RequestContext::identity`.
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
use crate::services::auth::authenticate;

pub async fn authentication_middleware(
    State(guard): State<GuardState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, GuardError> {
    let outcome = authenticate(&guard.app, req.headers()).await;

    if let Some(identity) = guard.mode.settle(outcome)? {
        // middleware → 後続の guard / extractor への受け渡し
        req.extensions_mut()
            .get_or_insert_default::<RequestContext>()
            .identity = Some(identity);
    }

    Ok(next.run(req).await)
}
