//! Routes for the step repository surface.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use serde::Deserialize;
use tracing::{info, instrument};

use roteiro_core::error::DomainError;
use roteiro_script::{ProductId, Step, StepId};

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for GET /.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepsQuery {
    /// Restrict the listing to one product.
    pub product_id: Option<String>,
}

/// GET / — all steps, or one product's steps in listing order.
async fn list_steps(
    State(state): State<AppState>,
    Query(query): Query<StepsQuery>,
) -> Json<Vec<Step>> {
    let product_id = query.product_id.map(ProductId::from);
    Json(state.repository.get_steps(product_id.as_ref()))
}

/// GET /{id}
async fn get_step(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Step>, ApiError> {
    let id = StepId::from(id);
    state
        .repository
        .get_step(&id)
        .map(Json)
        .ok_or_else(|| DomainError::StepNotFound(id.to_string()).into())
}

/// POST /
#[instrument(skip(state, step), fields(step_id = %step.id))]
async fn create_step(
    State(state): State<AppState>,
    Json(step): Json<Step>,
) -> Result<(StatusCode, Json<Step>), ApiError> {
    info!("creating step");
    state.repository.create_step(step.clone())?;
    Ok((StatusCode::CREATED, Json(step)))
}

/// PUT /{id} — the path id is authoritative; ids stay stable across edits.
#[instrument(skip(state, step), fields(step_id = %id))]
async fn update_step(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut step): Json<Step>,
) -> Result<Json<Step>, ApiError> {
    step.id = StepId::from(id);
    info!("updating step");
    state.repository.update_step(step.clone())?;
    Ok(Json(step))
}

/// DELETE /{id}
#[instrument(skip(state), fields(step_id = %id))]
async fn delete_step(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    info!("deleting step");
    state.repository.delete_step(&StepId::from(id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for the step repository surface.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_steps).post(create_step))
        .route(
            "/{id}",
            get(get_step).put(update_step).delete(delete_step),
        )
}
