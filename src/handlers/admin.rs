use axum::{extract::State, Json};

use crate::error::ApiError;
use crate::models::admin::ClearProductsResponse;
use crate::models::common::MessageResponse;
use crate::services::admin as admin_service;
use crate::AppState;

pub async fn clear_products(
    State(state): State<AppState>,
) -> Result<Json<ClearProductsResponse>, ApiError> {
    let deleted = admin_service::clear_products(&state.db).await?;

    Ok(Json(ClearProductsResponse {
        success: true,
        message: "Datos de productos eliminados exitosamente".to_string(),
        summary: format!(
            "Se eliminaron {} productos y {} asociaciones de materiales",
            deleted.products, deleted.product_materials
        ),
        deleted,
    }))
}

pub async fn seed_sample_data(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    admin_service::seed_sample_data(&state.db).await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Datos de prueba insertados: currencies, warehouses y branches".to_string(),
    }))
}
