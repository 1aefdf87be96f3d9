//! REST routes and health check handlers.

use axum::routing::{delete, get, post, put};
use axum::{Json, Router, extract::State};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;

use crate::services::{auth, speakers, users};
use crate::startup::AppState;

/// Build version.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    checks: Option<HealthChecks>,
}

#[derive(Serialize)]
pub struct HealthChecks {
    database: CheckResult,
}

#[derive(Serialize)]
pub struct CheckResult {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl CheckResult {
    const fn healthy() -> Self {
        Self {
            status: "healthy",
            message: None,
        }
    }

    fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: "unhealthy",
            message: Some(message.into()),
        }
    }
}

/// Build all REST routes with the given application state.
pub fn rest_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "speaker-service" }))
        .route("/health", get(|| async { "OK" }))
        .route("/health/live", get(|| async { "OK" }))
        .route("/health/ready", get(readiness_handler))
        .route("/v1/auth/login", post(auth::login))
        .route("/v1/auth/password", post(auth::change_password))
        .route("/v1/users", get(users::list_accounts).post(users::create_account))
        .route("/v1/users/{id}", delete(users::delete_account))
        .route("/v1/users/{id}/password", post(users::reset_password))
        .route(
            "/v1/speakers",
            get(speakers::list_speakers).post(speakers::create_speaker),
        )
        .route("/v1/speakers/email-check", get(speakers::email_check))
        .route("/v1/speakers/import", post(speakers::import_speakers))
        .route("/v1/speakers/export", get(speakers::export_speakers))
        .route(
            "/v1/speakers/{id}",
            put(speakers::update_speaker).delete(speakers::delete_speaker),
        )
        .with_state(state)
}

/// Add the Prometheus metrics endpoint.
pub fn rest_routes_with_metrics(state: AppState, metrics_handle: PrometheusHandle) -> Router {
    rest_routes(state).route(
        "/metrics",
        get(move || {
            let handle = metrics_handle.clone();
            async move { handle.render() }
        }),
    )
}

async fn readiness_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_check = if state.db.health_check().await {
        CheckResult::healthy()
    } else {
        CheckResult::unhealthy("Database connection failed")
    };

    let healthy = db_check.status == "healthy";

    Json(HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" },
        version: VERSION,
        checks: Some(HealthChecks { database: db_check }),
    })
}
