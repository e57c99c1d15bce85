use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProductMaterials::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductMaterials::ProductId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductMaterials::MaterialId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(ProductMaterials::ProductId)
                            .col(ProductMaterials::MaterialId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_product_materials_product_id")
                    .from(ProductMaterials::Table, ProductMaterials::ProductId)
                    .to(Products::Table, Products::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_product_materials_material_id")
                    .from(ProductMaterials::Table, ProductMaterials::MaterialId)
                    .to(Materials::Table, Materials::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        // Reverse lookup: which products use a material
        manager
            .create_index(
                Index::create()
                    .name("idx_product_materials_material_id")
                    .table(ProductMaterials::Table)
                    .col(ProductMaterials::MaterialId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProductMaterials::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ProductMaterials {
    Table,
    ProductId,
    MaterialId,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Materials {
    Table,
    Id,
}
