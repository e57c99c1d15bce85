use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set, SqlErr,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::entities::{prelude::*, products};
use crate::error::ApiError;
use crate::models::product::ValidProduct;

pub const DUPLICATE_CODE: &str = "Este código ya existe";
pub const CURRENCY_NOT_FOUND: &str = "Moneda no encontrada";

/// Insert a validated product.
///
/// The availability lookup only produces a friendlier error early; a
/// concurrent insert with the same code still loses on the unique key and
/// is reported as the same conflict.
pub async fn create_product(
    db: &DatabaseConnection,
    product: ValidProduct,
) -> Result<products::Model, ApiError> {
    let correlation_id = Uuid::new_v4();
    debug!(%correlation_id, code = %product.code, "Creating product");

    if Currencies::find_by_id(product.currency_id)
        .one(db)
        .await?
        .is_none()
    {
        info!(%correlation_id, currency_id = product.currency_id, "Unknown currency");
        return Err(ApiError::NotFound(CURRENCY_NOT_FOUND.to_string()));
    }

    if !is_code_available(db, &product.code).await? {
        info!(%correlation_id, code = %product.code, "Code already registered");
        return Err(ApiError::Conflict(DUPLICATE_CODE.to_string()));
    }

    let code = product.code.clone();
    let inserted = products::ActiveModel {
        code: Set(product.code),
        name: Set(product.name),
        price: Set(product.price),
        currency_id: Set(product.currency_id),
        description: Set(product.description),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| insert_error(e, &code, correlation_id))?;

    info!(
        %correlation_id,
        id = inserted.id,
        code = %inserted.code,
        "Product created"
    );

    Ok(inserted)
}

fn insert_error(err: DbErr, code: &str, correlation_id: Uuid) -> ApiError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            warn!(%correlation_id, code = %code, "Lost insert race on product code");
            ApiError::Conflict(DUPLICATE_CODE.to_string())
        }
        // Currency removed between the lookup and the insert
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            ApiError::NotFound(CURRENCY_NOT_FOUND.to_string())
        }
        _ => ApiError::from(err),
    }
}

/// True when no product row carries `code`.
pub async fn is_code_available(db: &DatabaseConnection, code: &str) -> Result<bool, DbErr> {
    let existing = Products::find()
        .filter(products::Column::Code.eq(code))
        .count(db)
        .await?;

    Ok(existing == 0)
}
