//! JWT authentication middleware.
//!
//! Validates Bearer tokens and injects `AuthInfo` into request extensions.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use http::{Request, Response, StatusCode};
use phf::phf_set;
use tower::{Layer, Service};
use tracing::{Span, debug};

use crate::auth::JwtValidator;
use crate::error::AppError;

/// Routes that bypass authentication.
/// Uses compile-time perfect hash function for O(1) lookup with zero runtime initialization.
static PUBLIC_ROUTES: phf::Set<&'static str> = phf_set! {
    "/",
    "/health",
    "/health/live",
    "/health/ready",
    "/metrics",
    "/v1/auth/login",
};

/// Tower layer for JWT authentication.
#[derive(Clone)]
pub struct AuthLayer {
    validator: JwtValidator,
}

impl AuthLayer {
    #[must_use]
    pub const fn new(validator: JwtValidator) -> Self {
        Self { validator }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            validator: self.validator.clone(),
        }
    }
}

/// Authentication middleware service.
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    validator: JwtValidator,
}

impl<S, ReqBody> Service<Request<ReqBody>> for AuthMiddleware<S>
where
    S: Service<Request<ReqBody>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        // Allow CORS preflight
        if req.method() == http::Method::OPTIONS {
            let mut inner = self.inner.clone();
            return Box::pin(async move { inner.call(req).await });
        }

        let path = req.uri().path();

        if is_public_route(path) {
            debug!(path, "Public route - skipping auth");
            let mut inner = self.inner.clone();
            return Box::pin(async move { inner.call(req).await });
        }

        match self.authenticate(&req) {
            Ok(auth_info) => {
                Span::current().record("user_id", auth_info.user_id.to_string());
                debug!(user_id = %auth_info.user_id, admin = auth_info.is_admin, "Authenticated");
                req.extensions_mut().insert(auth_info);
                let mut inner = self.inner.clone();
                Box::pin(async move { inner.call(req).await })
            }
            Err(err) => Box::pin(async move { Ok(build_error_response(&err)) }),
        }
    }
}

impl<S> AuthMiddleware<S> {
    const BEARER_PREFIX: &str = "Bearer ";

    fn authenticate<T>(&self, req: &Request<T>) -> Result<crate::auth::AuthInfo, AppError> {
        let header = req
            .headers()
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Unauthenticated("Missing authorization header".to_string())
            })?;

        let token = header
            .strip_prefix(Self::BEARER_PREFIX)
            .or_else(|| header.strip_prefix("bearer "))
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AppError::Unauthenticated("Invalid authorization header".to_string())
            })?;

        self.validator.validate(token)
    }
}

/// Check if a path is public.
fn is_public_route(path: &str) -> bool {
    PUBLIC_ROUTES.contains(path)
}

/// Build the 401 response for failed authentication.
fn build_error_response(err: &AppError) -> Response<Body> {
    Response::builder()
        .status(StatusCode::UNAUTHORIZED)
        .header("content-type", "application/json")
        .header("www-authenticate", "Bearer")
        .body(Body::from(format!(r#"{{"error":"{err}"}}"#)))
        .expect("valid response")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_routes_identified_correctly() {
        assert!(is_public_route("/"));
        assert!(is_public_route("/health"));
        assert!(is_public_route("/health/live"));
        assert!(is_public_route("/health/ready"));
        assert!(is_public_route("/metrics"));
        assert!(is_public_route("/v1/auth/login"));

        // Protected routes
        assert!(!is_public_route("/v1/auth/password"));
        assert!(!is_public_route("/v1/users"));
        assert!(!is_public_route("/v1/speakers"));
        assert!(!is_public_route("/v1/speakers/import"));
    }

    #[test]
    fn validator_rejects_invalid_token() {
        use secrecy::SecretString;

        let secret = SecretString::from("test_secret_32_chars_minimum!!!!");
        let validator = JwtValidator::new(&secret);
        assert!(validator.validate("invalid.token.here").is_err());
    }
}
