//! Consumption Routes
//!
//! - GET /api/consumptions - List all records
//! - POST /api/consumption - Create a record
//! - PUT /api/consumption/:id - Replace a record
//! - DELETE /api/consumption/:id - Delete a record

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::DeleteResponse;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::records::{ConsumptionRecord, NewConsumption};

/// GET /api/consumptions
pub async fn list_consumptions(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<ConsumptionRecord>> {
    Json(state.store.list().await)
}

/// POST /api/consumption
///
/// Returns the stored record, including its new `_id`.
pub async fn create_consumption(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewConsumption>,
) -> ApiResult<(StatusCode, Json<ConsumptionRecord>)> {
    validate_fields(&req.name, &req.kind, &req.category, &req.source, req.value)?;

    let record = state.store.create(req).await?;
    tracing::info!(id = ?record.id, name = %record.name, "Consumption created");

    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /api/consumption/:id
///
/// The path id wins over any `_id` in the body.
pub async fn update_consumption(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<ConsumptionRecord>,
) -> ApiResult<Json<ConsumptionRecord>> {
    validate_fields(&req.name, &req.kind, &req.category, &req.source, req.value)?;

    let record = state.store.update(&id, req).await?;
    tracing::info!(id = %id, "Consumption updated");

    Ok(Json(record))
}

/// DELETE /api/consumption/:id
pub async fn delete_consumption(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    state.store.delete(&id).await?;
    tracing::info!(id = %id, "Consumption deleted");

    Ok(Json(DeleteResponse { deleted: id }))
}

fn validate_fields(
    name: &str,
    kind: &str,
    category: &str,
    source: &str,
    value: f64,
) -> ApiResult<()> {
    let required = [
        ("name", name),
        ("type", kind),
        ("category", category),
        ("source", source),
    ];
    for (field, v) in required {
        if v.trim().is_empty() {
            return Err(ApiError::Validation(format!("{} is required", field)));
        }
    }

    if !value.is_finite() {
        return Err(ApiError::Validation("value must be a finite number".to_string()));
    }

    Ok(())
}
