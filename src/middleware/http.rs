//! Layers wrapped once around the whole router, outside the guard pipeline.
//!
//! Order, outermost first: error mapping, request id, body limit, request deadline,
//! access-log span. The span carries the request id, so every guard log line emitted
//! while handling a request (authentication, tenant, membership, role) is tagged with
//! it.

use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::http::{Request, StatusCode, header::HeaderName};
use tower::timeout::TimeoutLayer;
use tower::{BoxError, ServiceBuilder};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{MakeSpan, TraceLayer};
use tracing::Span;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// `request` span with method, path and the id assigned by `SetRequestIdLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, req: &Request<B>) -> Span {
        let request_id = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %req.method(),
            path = %req.uri().path(),
            request_id = %request_id,
        )
    }
}

pub fn apply(router: Router, request_timeout: Duration) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    let layers = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(|err: BoxError| async move {
            if err.is::<tower::timeout::error::Elapsed>() {
                tracing::warn!("request deadline exceeded");
                StatusCode::REQUEST_TIMEOUT
            } else {
                tracing::error!(error = %err, "unhandled middleware error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }))
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http().make_span_with(RequestSpan));

    router.layer(layers)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::routing::get;
    use tower::ServiceExt;

    use super::*;

    fn router(request_timeout: Duration) -> Router {
        let slow = Router::new()
            .route("/fast", get(|| async { "ok" }))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "late"
                }),
            );
        apply(slow, request_timeout)
    }

    fn request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).expect("request")
    }

    #[test]
    fn span_is_built_for_any_body_type() {
        let req = Request::builder()
            .uri("/api/v1/me")
            .header(REQUEST_ID_HEADER, "req-123")
            .body(())
            .expect("request");

        // without a subscriber the span is disabled, but must still build
        let _span = RequestSpan.make_span(&req);
    }

    #[tokio::test]
    async fn client_request_id_is_echoed() {
        let req = Request::builder()
            .uri("/fast")
            .header(REQUEST_ID_HEADER, "req-123")
            .body(Body::empty())
            .expect("request");

        let res = router(Duration::from_secs(5)).oneshot(req).await.expect("response");

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[REQUEST_ID_HEADER], "req-123");
    }

    #[tokio::test]
    async fn missing_request_id_is_generated() {
        let res = router(Duration::from_secs(5))
            .oneshot(request("/fast"))
            .await
            .expect("response");

        assert!(!res.headers()[REQUEST_ID_HEADER].is_empty());
    }

    #[tokio::test]
    async fn configured_deadline_is_enforced() {
        let res = router(Duration::from_millis(50))
            .oneshot(request("/slow"))
            .await
            .expect("response");

        assert_eq!(res.status(), StatusCode::REQUEST_TIMEOUT);
    }
}
