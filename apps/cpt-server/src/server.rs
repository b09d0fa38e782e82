//! HTTP host: middleware stack and the serve loop.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, Request, Response, StatusCode};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::field::Empty;

use crate::config::ServerConfig;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Generates a `nanoid` for requests arriving without an `x-request-id`.
#[derive(Clone, Copy, Default)]
pub struct MakeReqId;

impl MakeRequestId for MakeReqId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = nanoid::nanoid!();
        id.parse().ok().map(RequestId::new)
    }
}

fn trace_layer(router: Router) -> Router {
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|req: &Request<axum::body::Body>| {
                let rid = req
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("n/a");

                tracing::info_span!(
                    "http_request",
                    method = %req.method(),
                    uri = %req.uri().path(),
                    request_id = %rid,
                    status = Empty,
                    latency_ms = Empty,
                )
            })
            .on_response(
                |res: &Response<axum::body::Body>,
                 latency: std::time::Duration,
                 span: &tracing::Span| {
                    span.record("status", res.status().as_u16());
                    span.record("latency_ms", latency.as_millis());
                },
            ),
    )
}

/// Wrap the application routes with the HTTP middleware stack.
///
/// Requests flow `SetRequestId` -> `PropagateRequestId` -> Trace -> Timeout ->
/// `BodyLimit` -> CORS -> routes.
#[must_use]
pub fn apply_middleware(mut router: Router, cfg: &ServerConfig) -> Router {
    if cfg.cors_enabled {
        router = router.layer(CorsLayer::permissive());
    }

    router = router.layer(RequestBodyLimitLayer::new(cfg.body_limit_bytes));
    router = router.layer(DefaultBodyLimit::max(cfg.body_limit_bytes));

    router = router.layer(TimeoutLayer::with_status_code(
        StatusCode::GATEWAY_TIMEOUT,
        cfg.request_timeout,
    ));

    router = trace_layer(router);

    let x_request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));
    router.layer(SetRequestIdLayer::new(x_request_id, MakeReqId))
}

fn parse_bind_address(addr: &str) -> Result<SocketAddr> {
    addr.parse()
        .with_context(|| format!("Invalid bind address '{addr}'"))
}

/// Bind and serve until a shutdown signal arrives.
///
/// # Errors
/// Returns an error when the address is invalid, the socket cannot be bound
/// or the server fails.
pub async fn serve(router: Router, listen_addr: &str) -> Result<()> {
    let addr = parse_bind_address(listen_addr)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("HTTP server bound on {}", addr);

    let shutdown = async {
        if let Err(e) = crate::signals::wait_for_shutdown().await {
            tracing::error!(error = %e, "Signal handling failed");
        }
        tracing::info!("HTTP server shutting down gracefully");
    };

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::routing::get;
    use tower::ServiceExt;

    fn app(cfg: &ServerConfig) -> Router {
        apply_middleware(Router::new().route("/ping", get(|| async { "pong" })), cfg)
    }

    #[tokio::test]
    async fn test_request_id_is_generated_and_propagated() {
        let resp = app(&ServerConfig::default())
            .oneshot(Request::get("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let id = resp.headers().get(REQUEST_ID_HEADER).unwrap();
        assert!(!id.is_empty());
    }

    #[tokio::test]
    async fn test_incoming_request_id_is_kept() {
        let req = Request::get("/ping")
            .header(REQUEST_ID_HEADER, "req-123")
            .body(Body::empty())
            .unwrap();
        let resp = app(&ServerConfig::default()).oneshot(req).await.unwrap();
        assert_eq!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), "req-123");
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let cfg = ServerConfig {
            body_limit_bytes: 8,
            ..ServerConfig::default()
        };
        let router = apply_middleware(
            Router::new().route("/echo", axum::routing::post(|body: String| async move { body })),
            &cfg,
        );
        let req = Request::post("/echo")
            .body(Body::from("this body is far too long"))
            .unwrap();
        let resp = router.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_bind_address_parsing() {
        assert!(parse_bind_address("127.0.0.1:8087").is_ok());
        assert!(parse_bind_address("localhost").is_err());
    }
}
