use axum::http::HeaderValue;
use product_registry::{
    build_router,
    config::{self, DbConfig, ServerConfig},
    AppState,
};
use sea_orm_migration::MigratorTrait;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,product_registry=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    config::load_env_file();

    let db_config = DbConfig::from_env().expect("Invalid database configuration");
    let server_config = ServerConfig::from_env().expect("Invalid server configuration");

    // Connect to database
    tracing::info!(database = %db_config, "Connecting to database...");
    let db = db_config
        .connect()
        .await
        .expect("Failed to connect to database");

    // Run migrations
    tracing::info!("Running migrations...");
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let state = AppState { db };

    let app = build_router(state).layer(cors_layer()).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO))
            .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
    );

    // Start server
    let listener = tokio::net::TcpListener::bind(server_config.addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!("Server listening on {}", server_config.addr);

    axum::serve(listener, app).await.expect("Server error");
}

/// Origins from `ALLOWED_ORIGINS` (comma separated), any origin when unset.
fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = std::env::var("ALLOWED_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}
