pub use super::branches::Entity as Branches;
pub use super::currencies::Entity as Currencies;
pub use super::materials::Entity as Materials;
pub use super::product_materials::Entity as ProductMaterials;
pub use super::products::Entity as Products;
pub use super::warehouses::Entity as Warehouses;
