//! Routes for the product repository surface.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use tracing::{info, instrument};

use roteiro_core::error::DomainError;
use roteiro_script::{Product, ProductId};

use crate::error::ApiError;
use crate::state::AppState;

/// GET / — all products ordered by name.
async fn list_products(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.repository.get_products())
}

/// GET /{id}
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let id = ProductId::from(id);
    state
        .repository
        .get_product(&id)
        .map(Json)
        .ok_or_else(|| DomainError::ProductNotFound(id.to_string()).into())
}

/// POST /
#[instrument(skip(state, product), fields(product_id = %product.id))]
async fn create_product(
    State(state): State<AppState>,
    Json(product): Json<Product>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    info!("creating product");
    state.repository.create_product(product.clone())?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /{id}
#[instrument(skip(state, product), fields(product_id = %id))]
async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut product): Json<Product>,
) -> Result<Json<Product>, ApiError> {
    product.id = ProductId::from(id);
    info!("updating product");
    state.repository.update_product(product.clone())?;
    Ok(Json(product))
}

/// DELETE /{id}
#[instrument(skip(state), fields(product_id = %id))]
async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    info!("deleting product");
    state.repository.delete_product(&ProductId::from(id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for the product repository surface.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}
