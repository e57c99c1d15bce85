pub use sea_orm_migration::prelude::*;

mod m20261016_000001_create_currencies;
mod m20261016_000002_create_warehouses;
mod m20261016_000003_create_branches;
mod m20261016_000004_create_materials;
mod m20261016_000005_create_products;
mod m20261016_000006_create_product_materials;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261016_000001_create_currencies::Migration),
            Box::new(m20261016_000002_create_warehouses::Migration),
            Box::new(m20261016_000003_create_branches::Migration),
            Box::new(m20261016_000004_create_materials::Migration),
            Box::new(m20261016_000005_create_products::Migration),
            Box::new(m20261016_000006_create_product_materials::Migration),
        ]
    }
}
