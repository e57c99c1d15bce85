use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "materials")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// 5-15 alphanumeric characters
    #[sea_orm(unique)]
    pub code: String,
    /// 1-20 characters
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product_materials::Entity")]
    ProductMaterials,
}

impl Related<super::product_materials::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductMaterials.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_materials::Relation::Product.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::product_materials::Relation::Material.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
