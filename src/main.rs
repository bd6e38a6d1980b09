use art_catalog_api::api::routes::create_router;
use art_catalog_api::config::AppConfig;
use art_catalog_api::store::PostgresStore;
use axum::serve;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging; RUST_LOG overrides, sqlx stays quiet by default
    use env_logger::{Builder, Env};
    use log::LevelFilter;

    Builder::from_env(Env::default().default_filter_or("info"))
        .filter_module("sqlx", LevelFilter::Warn)
        .init();

    let config = AppConfig::load()?;
    log::info!(
        "Configuration loaded: server={}:{} legacy_status_codes={}",
        config.server.host,
        config.server.port,
        config.api.legacy_status_codes
    );

    log::info!("Connecting to PostgreSQL...");
    let database_url = config.database_url()?;
    let store = Arc::new(PostgresStore::new(&database_url, config.database.max_connections).await?);

    run_server(create_router::<PostgresStore>(&config.api).with_state(store), &config).await?;

    Ok(())
}

async fn run_server(app: axum::Router, config: &AppConfig) -> anyhow::Result<()> {
    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    log::info!("Art catalog API listening on http://{}", bind_address);

    serve(listener, app).await?;

    Ok(())
}
