// src/lib.rs

use axum::{
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

pub mod entities {
    pub mod prelude;
    pub mod branches;
    pub mod currencies;
    pub mod materials;
    pub mod product_materials;
    pub mod products;
    pub mod warehouses;
}

pub mod services {
    pub mod admin;
    pub mod material;
    pub mod product;
}

pub mod client {
    pub mod api;
    pub mod controller;
}

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod validation;

/// All endpoints, without middleware layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::banner))
        .route("/get_materials", get(handlers::lookup::get_materials))
        .route("/get_warehouses", get(handlers::lookup::get_warehouses))
        .route("/get_branches", get(handlers::lookup::get_branches))
        .route("/get_currencies", get(handlers::lookup::get_currencies))
        .route("/check_code", get(handlers::lookup::check_code))
        .route("/validation_rules", get(handlers::rules::validation_rules))
        .route("/insert_product", post(handlers::product::insert_product))
        .route("/insert_material", post(handlers::material::insert_material))
        .route(
            "/associate_materials",
            post(handlers::material::associate_materials),
        )
        .route("/clear_products", post(handlers::admin::clear_products))
        .route("/seed_sample_data", post(handlers::admin::seed_sample_data))
        .with_state(state)
}
