//! Product catalogue endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{parse_id, ApiError, Json};
use crate::domain::product::{Product, ProductId, ProductInput};

/// Create the products router
pub fn create_products_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{product_id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// POST /products
pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    debug!("Creating product");

    let product = state.product_service.create(input).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /products
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.product_service.list().await?))
}

/// GET /products/{product_id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let id: ProductId = parse_id(&product_id, "product")?;

    Ok(Json(state.product_service.get(id).await?))
}

/// PUT /products/{product_id}
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(input): Json<ProductInput>,
) -> Result<Json<Product>, ApiError> {
    let id: ProductId = parse_id(&product_id, "product")?;
    debug!(product_id = %id, "Updating product");

    Ok(Json(state.product_service.update(id, input).await?))
}

/// DELETE /products/{product_id}
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: ProductId = parse_id(&product_id, "product")?;
    debug!(product_id = %id, "Deleting product");

    state.product_service.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
