//! Server startup and wiring.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use http::Request;
use metrics_exporter_prometheus::PrometheusHandle;
use secrecy::SecretString;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{Level, info};

use crate::auth::JwtValidator;
use crate::config::Config;
use crate::db::{Database, create_pool};
use crate::import::ImportPipeline;
use crate::middleware::{AuthLayer, MetricsLayer, RequestIdLayer};
use crate::routes::rest_routes_with_metrics;

/// Request timeout duration.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Token issuing configuration shared with the login handler.
pub struct TokenConfig {
    pub jwt_secret_key: SecretString,
    pub access_token_ttl_minutes: u64,
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    /// The import pipeline with its immutable alias table, built once here.
    pub pipeline: Arc<ImportPipeline>,
    pub tokens: Arc<TokenConfig>,
}

/// Build and configure the complete application.
pub async fn build_app(
    config: &Config,
    metrics_handle: PrometheusHandle,
) -> anyhow::Result<(Router, SocketAddr)> {
    // Shared JWT validator, created once
    let jwt_validator = JwtValidator::new(&config.jwt_secret_key);

    // Database
    let pool = create_pool(config).await?;
    info!("Connected to database");
    sqlx::migrate!().run(&pool).await?;
    let database = Database::new(pool);

    // Server address
    let addr: SocketAddr = config.http_address.parse()?;

    // Application state
    let app_state = AppState {
        db: database,
        pipeline: Arc::new(ImportPipeline::new()),
        tokens: Arc::new(TokenConfig {
            jwt_secret_key: config.jwt_secret_key.clone(),
            access_token_ttl_minutes: config.access_token_ttl_minutes,
        }),
    };

    let rest_router = rest_routes_with_metrics(app_state, metrics_handle);

    // Build middleware stack with ServiceBuilder (executes top-to-bottom on request)
    let cors = build_cors(config.cors_allow_origins.as_deref());
    let middleware = ServiceBuilder::new()
        // 1. Request ID - generate/propagate first
        .layer(RequestIdLayer::new())
        // 2. Metrics - capture the full request lifecycle
        .layer(MetricsLayer::new())
        // 3. Tracing - create span with request details
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<_>| {
                    tracing::info_span!(
                        "request",
                        method = %req.method(),
                        uri = %req.uri(),
                        request_id = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                    )
                })
                .on_response(tower_http::trace::DefaultOnResponse::new().level(Level::DEBUG)),
        )
        // 4. Timeout - prevent hung requests
        .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        // 5. CORS - handle preflight before auth
        .layer(cors)
        // 6. Auth - JWT validation (skips public routes)
        .layer(AuthLayer::new(jwt_validator));

    let app = rest_router
        .layer(DefaultBodyLimit::max(config.max_import_bytes))
        .layer(middleware);

    Ok((app, addr))
}

fn build_cors(origins: Option<&str>) -> CorsLayer {
    let cors = match origins {
        Some(o) if o.trim() == "*" => CorsLayer::permissive(),
        Some(o) => {
            let origins: Vec<_> = o.split(',').filter_map(|s| s.trim().parse().ok()).collect();
            CorsLayer::new().allow_origin(origins)
        }
        None => CorsLayer::permissive(),
    };

    cors.allow_headers(Any)
        .expose_headers(["x-request-id".parse().unwrap()])
        .allow_methods(Any)
        .max_age(Duration::from_secs(3600))
}
