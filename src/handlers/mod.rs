pub mod admin;
pub mod lookup;
pub mod material;
pub mod product;
pub mod rules;

pub async fn banner() -> &'static str {
    "Product Registry API"
}
