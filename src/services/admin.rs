//! Bulk maintenance: wiping registered products and seeding reference data.

use std::collections::HashMap;

use sea_orm::{
    sea_query::OnConflict, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::info;

use crate::entities::{branches, currencies, prelude::*, warehouses};
use crate::models::admin::DeletedCounts;

/// (name, symbol)
pub const SAMPLE_CURRENCIES: &[(&str, &str)] = &[
    ("Peso Chileno", "CLP"),
    ("Dólar Americano", "USD"),
    ("Euro", "EUR"),
];

/// (warehouse, its branches)
pub const SAMPLE_WAREHOUSES: &[(&str, &[&str])] = &[
    ("Bodega Central", &["Sucursal Centro", "Sucursal Plaza"]),
    ("Bodega Norte", &["Sucursal Norte", "Sucursal Universidad"]),
    ("Bodega Sur", &["Sucursal Sur", "Sucursal Industrial"]),
];

/// Delete every association and product in one transaction.
///
/// Materials and reference data are left alone.
pub async fn clear_products(db: &DatabaseConnection) -> Result<DeletedCounts, DbErr> {
    let txn = db.begin().await?;

    let product_materials = ProductMaterials::delete_many()
        .exec(&txn)
        .await?
        .rows_affected;
    let products = Products::delete_many().exec(&txn).await?.rows_affected;

    txn.commit().await?;

    info!(products, product_materials, "Cleared product data");
    Ok(DeletedCounts {
        products,
        product_materials,
    })
}

/// Insert sample currencies, warehouses and branches. Rows that already
/// exist are skipped, so repeated calls are harmless.
pub async fn seed_sample_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    let txn = db.begin().await?;

    Currencies::insert_many(SAMPLE_CURRENCIES.iter().map(|(name, symbol)| {
        currencies::ActiveModel {
            name: Set(name.to_string()),
            symbol: Set(symbol.to_string()),
            ..Default::default()
        }
    }))
    .on_conflict(
        OnConflict::column(currencies::Column::Name)
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(&txn)
    .await?;

    Warehouses::insert_many(SAMPLE_WAREHOUSES.iter().map(|(description, _)| {
        warehouses::ActiveModel {
            description: Set(description.to_string()),
            ..Default::default()
        }
    }))
    .on_conflict(
        OnConflict::column(warehouses::Column::Description)
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(&txn)
    .await?;

    let warehouse_ids: HashMap<String, i32> = Warehouses::find()
        .filter(
            warehouses::Column::Description
                .is_in(SAMPLE_WAREHOUSES.iter().map(|(description, _)| *description)),
        )
        .all(&txn)
        .await?
        .into_iter()
        .map(|w| (w.description, w.id))
        .collect();

    let branch_rows: Vec<branches::ActiveModel> = SAMPLE_WAREHOUSES
        .iter()
        .filter_map(|(warehouse, names)| {
            warehouse_ids.get(*warehouse).map(|id| (*id, *names))
        })
        .flat_map(|(warehouse_id, names)| {
            names.iter().map(move |name| branches::ActiveModel {
                description: Set(name.to_string()),
                warehouse_id: Set(warehouse_id),
                ..Default::default()
            })
        })
        .collect();

    if !branch_rows.is_empty() {
        Branches::insert_many(branch_rows)
            .on_conflict(
                OnConflict::columns([branches::Column::WarehouseId, branches::Column::Description])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;
    }

    txn.commit().await?;

    info!("Sample reference data seeded");
    Ok(())
}
