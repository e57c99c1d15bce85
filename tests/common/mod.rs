use lazy_static::lazy_static;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::env;
use tokio::sync::Mutex;

lazy_static! {
    /// Serializes tests that share the database; `clear_products` wipes
    /// rows other tests rely on.
    pub static ref DB_LOCK: Mutex<()> = Mutex::new(());
}

/// Set up test database connection
/// Uses TEST_DATABASE_URL; returns None (test skipped) when it is unset
pub async fn setup_test_db() -> Option<DatabaseConnection> {
    let Ok(database_url) = env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping database test");
        return None;
    };

    let db = Database::connect(&database_url)
        .await
        .expect("Failed to connect to test DB");
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    product_registry::services::admin::seed_sample_data(&db)
        .await
        .expect("Failed to seed reference data");

    Some(db)
}

/// Unique, valid product or material code: two fixed characters plus ten hex digits
#[allow(dead_code)]
pub fn unique_code(prefix: &str) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}{}", prefix, &suffix[..10]).to_uppercase()
}
