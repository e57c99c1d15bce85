use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::error::ApiError;
use crate::models::material::{
    AssociateMaterialsRequest, AssociateMaterialsResponse, AssociationDraft,
    InsertMaterialRequest, InsertMaterialResponse, MaterialDraft,
};
use crate::services::material as material_service;
use crate::AppState;

pub async fn insert_material(
    State(state): State<AppState>,
    payload: Result<Json<InsertMaterialRequest>, JsonRejection>,
) -> Result<Json<InsertMaterialResponse>, ApiError> {
    let Json(request) = payload?;
    let material = MaterialDraft::from(&request).validate()?;

    let created = material_service::create_material(&state.db, material).await?;

    Ok(Json(InsertMaterialResponse {
        success: true,
        id: created.id,
        message: "Material creado exitosamente".to_string(),
    }))
}

/// Replace the full material set of a product.
pub async fn associate_materials(
    State(state): State<AppState>,
    payload: Result<Json<AssociateMaterialsRequest>, JsonRejection>,
) -> Result<Json<AssociateMaterialsResponse>, ApiError> {
    let Json(request) = payload?;
    let set = AssociationDraft::from(&request).validate()?;

    material_service::replace_associations(&state.db, &set).await?;

    Ok(Json(AssociateMaterialsResponse {
        success: true,
        message: format!(
            "Se asociaron {} materiales al producto",
            set.material_ids.len()
        ),
        product_id: set.product_id,
        material_ids: set.material_ids,
    }))
}
