//! Routes for bundle import/export and the script report.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::{Json, Router, routing::get, routing::post};
use tracing::{info, instrument};

use roteiro_script::ProductId;
use roteiro_transfer::{ImportOutcome, export_bundle, import_bundle, script_report};

use crate::error::ApiError;
use crate::state::AppState;

/// POST /import — consume an external script bundle. Invalid steps are
/// skipped and itemized in the response; a malformed bundle is rejected
/// whole with a validation error.
#[instrument(skip(state, bundle))]
async fn import(
    State(state): State<AppState>,
    Json(bundle): Json<serde_json::Value>,
) -> Result<Json<ImportOutcome>, ApiError> {
    let outcome = import_bundle(&state.repository, &bundle)?;
    info!(
        products = outcome.product_count,
        steps = outcome.step_count,
        "bundle import finished"
    );
    Ok(Json(outcome))
}

/// GET /export/{productId} — the product's script in bundle form.
async fn export(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let bundle = export_bundle(&state.repository, &ProductId::from(product_id))?;
    Ok(Json(bundle))
}

/// GET /report/{productId} — the CSV script report.
async fn report(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let csv = script_report(
        &state.repository,
        &ProductId::from(product_id),
        state.clock.as_ref(),
    )?;
    Ok((
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        csv,
    ))
}

/// Returns the router for import/export.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/import", post(import))
        .route("/export/{product_id}", get(export))
        .route("/report/{product_id}", get(report))
}
