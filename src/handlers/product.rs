use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::error::ApiError;
use crate::models::product::{InsertProductRequest, InsertProductResponse, ProductDraft};
use crate::services::product as product_service;
use crate::AppState;

pub async fn insert_product(
    State(state): State<AppState>,
    payload: Result<Json<InsertProductRequest>, JsonRejection>,
) -> Result<Json<InsertProductResponse>, ApiError> {
    let Json(request) = payload?;
    let product = ProductDraft::from(&request).validate()?;

    let created = product_service::create_product(&state.db, product).await?;

    Ok(Json(InsertProductResponse {
        success: true,
        id: created.id,
        created_at: created.created_at,
    }))
}
