use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Branches::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Branches::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Branches::Description)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Branches::WarehouseId)
                            .integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_branches_warehouse_id")
                    .from(Branches::Table, Branches::WarehouseId)
                    .to(Warehouses::Table, Warehouses::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        // Seeding relies on this for ON CONFLICT (warehouse_id, description)
        manager
            .create_index(
                Index::create()
                    .name("idx_branches_warehouse_description")
                    .table(Branches::Table)
                    .col(Branches::WarehouseId)
                    .col(Branches::Description)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Branches::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Branches {
    Table,
    Id,
    Description,
    WarehouseId,
}

#[derive(DeriveIden)]
enum Warehouses {
    Table,
    Id,
}
