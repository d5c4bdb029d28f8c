//! General-purpose middleware for the API.
//!
//! CORS and request tracing layers applied to the whole router.

use std::time::Duration;

use axum::http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

/// Allows `origin` when set and valid, otherwise any origin.
pub fn cors(origin: Option<&str>) -> CorsLayer {
    let allow_origin = match origin.map(HeaderValue::from_str) {
        Some(Ok(value)) => AllowOrigin::exact(value),
        Some(Err(e)) => {
            warn!("Ignoring invalid CORS_ORIGIN: {e}");
            AllowOrigin::any()
        }
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60))
}

/// Request/response spans at the level set by `RUST_LOG`.
pub fn trace() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Router};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_cors_echoes_configured_origin() {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(cors(Some("http://portal.campus.edu")));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("origin", "http://portal.campus.edu")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "http://portal.campus.edu"
        );
    }

    #[tokio::test]
    async fn test_cors_falls_back_to_any() {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(cors(Some("not a header\n")));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("origin", "http://elsewhere.test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers().get("access-control-allow-origin").unwrap(), "*");
    }
}
