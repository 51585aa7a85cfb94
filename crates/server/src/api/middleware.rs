//! Request metrics middleware.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use crate::metrics::{HTTP_REQUESTS_IN_FLIGHT, HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION};

/// Route label for requests no route matched.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Records duration, count and in-flight requests per route.
///
/// Requests are labelled by the route template they matched, so
/// `/api/v1/moderngov/committees?site_url=...` and any caller-supplied path
/// segments collapse onto one series. Misses share [`UNMATCHED_ROUTE`].
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());

    HTTP_REQUESTS_IN_FLIGHT.inc();
    let response = next.run(request).await;
    HTTP_REQUESTS_IN_FLIGHT.dec();

    let status = response.status().as_u16().to_string();
    let labels = [method.as_str(), route.as_str(), status.as_str()];
    HTTP_REQUEST_DURATION
        .with_label_values(&labels)
        .observe(start.elapsed().as_secs_f64());
    HTTP_REQUESTS_TOTAL.with_label_values(&labels).inc();

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Path,
        http::StatusCode,
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    async fn echo(Path(id): Path<u32>) -> String {
        id.to_string()
    }

    fn app() -> Router {
        let inner = Router::new().route("/wards/{id}", get(echo));
        Router::new()
            .nest("/test-metrics", inner)
            .layer(middleware::from_fn(metrics_middleware))
    }

    fn count(route: &str, status: &str) -> u64 {
        HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", route, status])
            .get()
    }

    async fn send(uri: &str) -> StatusCode {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        app().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_labels_use_route_template() {
        let route = "/test-metrics/wards/{id}";
        let before = count(route, "200");

        assert_eq!(send("/test-metrics/wards/17").await, StatusCode::OK);
        assert_eq!(send("/test-metrics/wards/4021?x=1").await, StatusCode::OK);

        assert_eq!(count(route, "200"), before + 2);
        assert_eq!(count("/test-metrics/wards/17", "200"), 0);
    }

    #[tokio::test]
    async fn test_unmatched_requests_share_one_label() {
        let before = count(UNMATCHED_ROUTE, "404");

        assert_eq!(send("/no-such-route/1").await, StatusCode::NOT_FOUND);
        assert_eq!(send("/another/missing/path").await, StatusCode::NOT_FOUND);

        assert_eq!(count(UNMATCHED_ROUTE, "404"), before + 2);
        assert_eq!(count("/no-such-route/1", "404"), 0);
    }
}
