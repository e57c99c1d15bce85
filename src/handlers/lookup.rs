use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use sea_orm::{ColumnTrait, EntityTrait, Order, QueryFilter, QueryOrder};

use crate::entities::{branches, currencies, materials, prelude::*, warehouses};
use crate::error::ApiError;
use crate::models::lookup::{
    BranchesQuery, BranchesResponse, CheckCodeQuery, CheckCodeResponse, CurrenciesResponse,
    CurrencyItem, MaterialItem, MaterialsResponse, NamedItem, WarehousesResponse,
};
use crate::services::product as product_service;
use crate::validation::{self, ValidationErrors};
use crate::AppState;

pub async fn get_materials(
    State(state): State<AppState>,
) -> Result<Json<MaterialsResponse>, ApiError> {
    let materials = Materials::find()
        .order_by(materials::Column::Description, Order::Asc)
        .all(&state.db)
        .await?;

    Ok(Json(MaterialsResponse {
        success: true,
        materials: materials.into_iter().map(MaterialItem::from).collect(),
    }))
}

pub async fn get_warehouses(
    State(state): State<AppState>,
) -> Result<Json<WarehousesResponse>, ApiError> {
    let warehouses = Warehouses::find()
        .order_by(warehouses::Column::Description, Order::Asc)
        .all(&state.db)
        .await?;

    Ok(Json(WarehousesResponse {
        success: true,
        warehouses: warehouses.into_iter().map(NamedItem::from).collect(),
    }))
}

/// Branches of one warehouse; `warehouse_id` must be a positive integer.
pub async fn get_branches(
    State(state): State<AppState>,
    query: Result<Query<BranchesQuery>, QueryRejection>,
) -> Result<Json<BranchesResponse>, ApiError> {
    let Query(params) = query?;
    validation::BRANCH_FILTER.validate(&params)?;

    let warehouse_id = params
        .warehouse_id
        .as_deref()
        .and_then(validation::parse_id)
        .ok_or_else(|| ValidationErrors::single("warehouse_id", "ID de bodega inválido"))?;

    let branches = Branches::find()
        .filter(branches::Column::WarehouseId.eq(warehouse_id))
        .order_by(branches::Column::Description, Order::Asc)
        .all(&state.db)
        .await?;

    Ok(Json(BranchesResponse {
        success: true,
        branches: branches.into_iter().map(NamedItem::from).collect(),
    }))
}

pub async fn get_currencies(
    State(state): State<AppState>,
) -> Result<Json<CurrenciesResponse>, ApiError> {
    let currencies = Currencies::find()
        .order_by(currencies::Column::Name, Order::Asc)
        .all(&state.db)
        .await?;

    Ok(Json(CurrenciesResponse {
        success: true,
        currencies: currencies.into_iter().map(CurrencyItem::from).collect(),
    }))
}

/// Advisory availability check used while the user types.
pub async fn check_code(
    State(state): State<AppState>,
    query: Result<Query<CheckCodeQuery>, QueryRejection>,
) -> Result<Json<CheckCodeResponse>, ApiError> {
    let Query(params) = query?;
    let code = params.code.as_deref().unwrap_or("").trim();
    if code.is_empty() {
        return Err(ApiError::Validation("Código no proporcionado".to_string()));
    }

    let available = product_service::is_code_available(&state.db, code).await?;

    Ok(Json(CheckCodeResponse {
        success: true,
        available,
    }))
}
