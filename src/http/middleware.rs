//! Health check interception.
//!
//! # Responsibilities
//! - Answer `GET <anything>/health` (case-insensitive) with an aggregate check
//! - Pass every other request to the next stage untouched
//!
//! # Design Decisions
//! - Stateless predicate; only the suffix and the method matter
//! - Other methods on a `/health` path are forwarded, not rejected

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request},
    middleware::{self, Next},
    response::Response,
    Router,
};

use crate::health::HealthChecker;

pub const HEALTH_SUFFIX: &str = "/health";

/// True when the request should be answered by the health checker.
pub fn is_health_request(method: &Method, path: &str) -> bool {
    method == Method::GET && path.to_lowercase().ends_with(HEALTH_SUFFIX)
}

pub async fn health_middleware(
    State(checker): State<HealthChecker>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if is_health_request(request.method(), request.uri().path()) {
        tracing::debug!(path = %request.uri().path(), "Serving health check");
        return checker.respond().await;
    }
    next.run(request).await
}

/// Put the health shim in front of an existing pipeline.
///
/// The middleware only wraps routes and fallbacks already registered on
/// `next`, so add those first.
pub fn with_health_check(next: Router, checker: HealthChecker) -> Router {
    next.layer(middleware::from_fn_with_state(checker, health_middleware))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::http::StatusCode;
    use tower::ServiceExt;

    use crate::config::HealthCheckConfig;
    use crate::discovery::StaticTargets;

    #[test]
    fn test_health_predicate() {
        assert!(is_health_request(&Method::GET, "/health"));
        assert!(is_health_request(&Method::GET, "/svc/HEALTH"));
        assert!(is_health_request(&Method::GET, "/a/b/Health"));

        assert!(!is_health_request(&Method::POST, "/svc/health"));
        assert!(!is_health_request(&Method::HEAD, "/svc/health"));
        assert!(!is_health_request(&Method::GET, "/svc/healthcheck"));
        assert!(!is_health_request(&Method::GET, "/svc/health/"));
        assert!(!is_health_request(&Method::GET, "/svchealth"));
    }

    fn app() -> Router {
        let checker = HealthChecker::new(
            Arc::new(StaticTargets::default()),
            &HealthCheckConfig::default(),
        );
        let next = Router::new().fallback(|| async { (StatusCode::IM_A_TEAPOT, "next") });
        with_health_check(next, checker)
    }

    async fn call(method: Method, uri: &str) -> (StatusCode, String) {
        let response = app()
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_get_health_is_intercepted() {
        let (status, body) = call(Method::GET, "/svc/HEALTH").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json, serde_json::json!({"status": "ok", "services": 0}));
    }

    #[tokio::test]
    async fn test_other_requests_reach_next_stage() {
        assert_eq!(call(Method::POST, "/svc/health").await, (StatusCode::IM_A_TEAPOT, "next".into()));
        assert_eq!(call(Method::GET, "/svc/healthcheck").await, (StatusCode::IM_A_TEAPOT, "next".into()));
        assert_eq!(call(Method::GET, "/").await, (StatusCode::IM_A_TEAPOT, "next".into()));
    }
}
