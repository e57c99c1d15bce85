use sea_orm::{ConnectionTrait, DbBackend, Statement};

use product_registry::config::{self, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    config::load_env_file();

    let db_config = DbConfig::from_env()?;
    println!("Configuración: {}", db_config);

    let db = db_config.connect().await?;
    println!("✓ Conexión exitosa");

    let version = db
        .query_one(Statement::from_string(
            DbBackend::Postgres,
            "SELECT version() AS version",
        ))
        .await?
        .map(|row| row.try_get::<String>("", "version"))
        .transpose()?
        .unwrap_or_default();
    println!("Servidor: {}", version);

    let tables = db
        .query_all(Statement::from_string(
            DbBackend::Postgres,
            "SELECT table_name::text AS table_name FROM information_schema.tables \
             WHERE table_schema = 'public' ORDER BY table_name",
        ))
        .await?;

    if tables.is_empty() {
        println!("No hay tablas en el esquema public (se crean al iniciar el servidor)");
    } else {
        println!("Tablas:");
        for row in tables {
            let name: String = row.try_get("", "table_name")?;
            println!("  - {}", name);
        }
    }

    Ok(())
}
