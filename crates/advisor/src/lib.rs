//! Routine Advisor library.
//!
//! A server-rendered product picker with an AI routine advisor. This crate
//! provides the web application as a library so the binary and the
//! integration tests assemble the same router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod proxy;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, extract::State, http::StatusCode, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::state::AppState;

/// Directory served under `/static`, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/advisor/static";

/// Build the application router.
///
/// Layer order, outermost first: HTTP tracing, request id, session.
pub fn app<S>(state: AppState, session_layer: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies session database connectivity when sessions are persisted.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    let Some(pool) = state.pool() else {
        return StatusCode::OK;
    };

    match sqlx::query("SELECT 1").fetch_one(pool).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;
    use tower_sessions::MemoryStore;
    use url::Url;

    use routine_advisor_core::Catalog;

    use super::*;
    use crate::config::{AdvisorConfig, CatalogSource, ProxyConfig, SentryConfig};
    use crate::middleware::{REQUEST_ID_HEADER, create_session_layer};

    fn router() -> Router {
        let config = AdvisorConfig {
            database_url: "sqlite::memory:".to_string(),
            host: [127, 0, 0, 1].into(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            catalog: CatalogSource::parse("products.json"),
            selection_ttl: Duration::from_secs(60),
            proxy: ProxyConfig {
                url: Url::parse("http://127.0.0.1:1/").expect("url"),
                model: "gpt-4o".to_string(),
                timeout: Duration::from_secs(1),
            },
            sentry: SentryConfig::default(),
        };
        let session_layer = create_session_layer(MemoryStore::default(), &config);
        let catalog = Catalog::new(Vec::new()).expect("catalog");
        let state = AppState::new(config, catalog, None).expect("state");
        app(state, session_layer)
    }

    async fn get(uri: &str) -> axum::response::Response {
        router()
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response")
    }

    #[tokio::test]
    async fn test_health() {
        let response = get("/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_readiness_without_database() {
        assert_eq!(get("/health/ready").await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        assert_eq!(get("/cart").await.status(), StatusCode::NOT_FOUND);
    }
}
