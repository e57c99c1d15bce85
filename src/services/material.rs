use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set, SqlErr, TransactionTrait,
};
use tracing::{debug, info};

use crate::entities::{materials, prelude::*, product_materials};
use crate::error::ApiError;
use crate::models::material::{MaterialSet, ValidMaterial};

pub const PRODUCT_NOT_FOUND: &str = "Producto no encontrado";
pub const MATERIALS_NOT_FOUND: &str = "Uno o más materiales no existen";
pub const DUPLICATE_MATERIAL_CODE: &str = "El código de material ya existe";

pub async fn create_material(
    db: &DatabaseConnection,
    material: ValidMaterial,
) -> Result<materials::Model, ApiError> {
    let inserted = materials::ActiveModel {
        code: Set(material.code),
        description: Set(material.description),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            ApiError::Conflict(DUPLICATE_MATERIAL_CODE.to_string())
        }
        _ => ApiError::from(e),
    })?;

    info!(id = inserted.id, code = %inserted.code, "Material created");
    Ok(inserted)
}

/// Replace every association of a product with `set`.
///
/// Existence of the product and of every material is checked before the
/// transaction opens, so a rejected request leaves the previous set intact.
pub async fn replace_associations(
    db: &DatabaseConnection,
    set: &MaterialSet,
) -> Result<(), ApiError> {
    if Products::find_by_id(set.product_id).one(db).await?.is_none() {
        return Err(ApiError::NotFound(PRODUCT_NOT_FOUND.to_string()));
    }

    let found = Materials::find()
        .filter(materials::Column::Id.is_in(set.material_ids.iter().copied()))
        .count(db)
        .await?;

    if found != set.material_ids.len() as u64 {
        debug!(
            product_id = set.product_id,
            requested = set.material_ids.len(),
            found,
            "Association references unknown materials"
        );
        return Err(ApiError::NotFound(MATERIALS_NOT_FOUND.to_string()));
    }

    // Dropping the transaction on an early return rolls it back
    let txn = db.begin().await?;

    let removed = ProductMaterials::delete_many()
        .filter(product_materials::Column::ProductId.eq(set.product_id))
        .exec(&txn)
        .await?
        .rows_affected;

    let rows = set
        .material_ids
        .iter()
        .map(|material_id| product_materials::ActiveModel {
            product_id: Set(set.product_id),
            material_id: Set(*material_id),
        });
    ProductMaterials::insert_many(rows)
        .exec_without_returning(&txn)
        .await?;

    txn.commit().await?;

    info!(
        product_id = set.product_id,
        removed,
        inserted = set.material_ids.len(),
        "Product materials replaced"
    );
    Ok(())
}
