//! SeaORM Entity for registered products
//!
//! `code` carries a unique constraint; it is the source of truth for
//! duplicate detection, not the advisory availability check.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// 5-15 alphanumeric characters with at least one letter and one digit
    #[sea_orm(unique)]
    pub code: String,
    /// 2-50 characters
    pub name: String,
    /// Positive amount with at most two decimal places
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
    pub currency_id: i32,
    /// 10-1000 characters
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Filled by the database default on insert
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::currencies::Entity",
        from = "Column::CurrencyId",
        to = "super::currencies::Column::Id"
    )]
    Currency,
    #[sea_orm(has_many = "super::product_materials::Entity")]
    ProductMaterials,
}

impl Related<super::currencies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Currency.def()
    }
}

impl Related<super::product_materials::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductMaterials.def()
    }
}

impl Related<super::materials::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_materials::Relation::Material.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::product_materials::Relation::Product.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
