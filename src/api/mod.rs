//! Spendline Record Server
//!
//! Reference HTTP server for consumption records, built with Axum. It
//! serves the routes `HttpConsumptionService` talks to.
//!
//! # Endpoints
//!
//! ## Consumptions
//! - `GET /api/consumptions` - List all records
//! - `POST /api/consumption` - Create a record
//! - `PUT /api/consumption/:id` - Replace a record
//! - `DELETE /api/consumption/:id` - Delete a record
//!
//! ## Health
//! - `GET /health` - Status, record count and uptime
//!
//! # Example
//!
//! ```rust,no_run
//! use spendline::api::{serve, ApiConfig, AppState, RecordStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(RecordStore::open("./consumptions.json").await?);
//!     let config = ApiConfig::default();
//!
//!     serve(AppState::new(store, config.clone()), &config).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};
pub use store::{RecordStore, StoreError, StoreResult};

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/consumptions", get(routes::consumptions::list_consumptions))
        .route("/consumption", post(routes::consumptions::create_consumption))
        .route(
            "/consumption/:id",
            put(routes::consumptions::update_consumption)
                .delete(routes::consumptions::delete_consumption),
        )
        .layer(DefaultBodyLimit::max(state.config.max_body_size));

    let cors = cors_layer(&state.config.cors_origins);
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(routes::health::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::permissive().allow_origin(AllowOrigin::list(allowed))
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Spendline API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Spendline API shut down gracefully");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::ConsumptionRecord;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    const LUNCH: &str = r#"{"name":"Lunch","type":"food","category":"daily","value":12.5,"source":"cash","date":"2024-03-01T12:30:00Z"}"#;

    fn create_test_app() -> (Router, Arc<RecordStore>) {
        let store = Arc::new(RecordStore::in_memory());
        let state = AppState::new(Arc::clone(&store), ApiConfig::default());
        (build_router(state), store)
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _store) = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let health: dto::HealthResponse = body_json(response).await;
        assert_eq!(health.records, 0);
        assert!(!health.persistent);
    }

    #[tokio::test]
    async fn test_list_empty() {
        let (app, _store) = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/consumptions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let records: Vec<ConsumptionRecord> = body_json(response).await;
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_create_returns_id() {
        let (app, store) = create_test_app();

        let response = app
            .oneshot(json_request("POST", "/api/consumption", LUNCH))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let record: ConsumptionRecord = body_json(response).await;
        assert!(record.id.is_some());
        assert_eq!(record.kind, "food");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_create_invalid_json() {
        let (app, _store) = create_test_app();

        let response = app
            .oneshot(json_request("POST", "/api/consumption", "not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_blank_name_rejected() {
        let (app, store) = create_test_app();
        let body = LUNCH.replace(r#""name":"Lunch""#, r#""name":" ""#);

        let response = app
            .oneshot(json_request("POST", "/api/consumption", &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (app, store) = create_test_app();
        let new: crate::records::NewConsumption = serde_json::from_str(LUNCH).unwrap();
        let created = store.create(new).await.unwrap();
        let id = created.id.clone().unwrap();

        let mut changed = created.clone();
        changed.value = 30.0;
        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/consumption/{}", id),
                &serde_json::to_string(&changed).unwrap(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(store.get(&id).await.unwrap().value, 30.0);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/consumption/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(store.is_empty().await);

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/consumption/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let (app, _store) = create_test_app();
        let body = LUNCH.replacen('{', r#"{"_id":"missing","#, 1);

        let response = app
            .oneshot(json_request("PUT", "/api/consumption/missing", &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
