pub mod admin;
pub mod common;
pub mod lookup;
pub mod material;
pub mod product;
