use dotenvy::dotenv;
use std::sync::Arc;
use substation_maintenance::{
    api::{AppState, build_router},
    clock::SystemClock,
    config,
    errors::Result,
    store::{JsonFileRepository, RecordStore},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received, stopping server.");
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the main application configuration
    let app_config = config::load_app_configuration()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;
    info!("Successfully processed application configuration.");

    // 4. Load the record document; an unreadable document is fatal
    let repository = Arc::new(JsonFileRepository::new(&app_config.server.data_path));
    let store = RecordStore::open(repository)
        .await
        .inspect(|_| info!("Record store loaded from {:?}", app_config.server.data_path))
        .inspect_err(|e| error!("Failed to load record document: {}", e))?;

    // 5. Serve
    let bind_addr = app_config.server.bind_addr.clone();
    let state = AppState {
        store: Arc::new(store),
        clock: Arc::new(SystemClock),
        config: Arc::new(app_config),
    };
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .inspect_err(|e| error!("Failed to bind {}: {}", bind_addr, e))?;
    info!("Server is running on {}", bind_addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
