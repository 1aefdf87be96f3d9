//! Request metrics middleware.
//!
//! Records request count and duration using the `metrics` crate (rendered
//! by the Prometheus exporter).
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `http_requests_total` | Counter | `method`, `path`, `status` |
//! | `http_request_duration_seconds` | Histogram | `method`, `path`, `status` |

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use http::{Request, Response};
use tower::{Layer, Service};

/// Known route prefixes for metric label normalization.
///
/// Paths carrying dynamic segments (record IDs) are reported under their
/// collection prefix; anything else unknown is bucketed as `/*`. This keeps
/// label cardinality bounded.
const KNOWN_PATHS: &[&str] = &[
    "/",
    "/health",
    "/health/live",
    "/health/ready",
    "/metrics",
    "/v1/auth/login",
    "/v1/auth/password",
    "/v1/speakers/email-check",
    "/v1/speakers/import",
    "/v1/speakers/export",
];

const COLLECTION_PREFIXES: &[&str] = &["/v1/speakers", "/v1/users"];

/// Tower layer for request metrics collection.
///
/// Placed after `RequestIdLayer` and before `AuthLayer` in the middleware
/// stack so it captures the full request lifecycle.
#[derive(Clone, Copy, Default)]
pub struct MetricsLayer;

impl MetricsLayer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for MetricsLayer {
    type Service = MetricsMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MetricsMiddleware { inner }
    }
}

/// Metrics middleware service.
#[derive(Clone)]
pub struct MetricsMiddleware<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for MetricsMiddleware<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let method = req.method().to_string();
        let path = normalize_path(req.uri().path());

        let start = Instant::now();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let response = inner.call(req).await?;

            let duration = start.elapsed().as_secs_f64();
            let status = response.status().as_u16().to_string();

            let labels = [("method", method), ("path", path), ("status", status)];

            metrics::counter!("http_requests_total", &labels).increment(1);
            metrics::histogram!("http_request_duration_seconds", &labels).record(duration);

            Ok(response)
        })
    }
}

/// Normalize paths to a known set to prevent label cardinality explosion.
fn normalize_path(path: &str) -> String {
    if KNOWN_PATHS.contains(&path) {
        return path.to_string();
    }

    for prefix in COLLECTION_PREFIXES {
        if path.starts_with(prefix) {
            return (*prefix).to_string();
        }
    }

    "/*".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_paths_pass_through() {
        assert_eq!(normalize_path("/health/ready"), "/health/ready");
        assert_eq!(normalize_path("/v1/speakers/import"), "/v1/speakers/import");
        assert_eq!(normalize_path("/metrics"), "/metrics");
    }

    #[test]
    fn id_segments_bucket_to_collection() {
        assert_eq!(
            normalize_path("/v1/speakers/7f9a4d6e-0000-0000-0000-000000000000"),
            "/v1/speakers"
        );
        assert_eq!(normalize_path("/v1/users/abc/password"), "/v1/users");
    }

    #[test]
    fn unknown_paths_bucketed() {
        assert_eq!(normalize_path("/unknown/route"), "/*");
    }
}
