//! Lockbox Server Binary
//!
//! Runs the Lockbox HTTP server.

use std::error::Error;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use lockbox_core::Argon2Hasher;
use lockbox_server::{
    create_router, AppState, MemoryStore, ServerConfig, StorageBackend, Store, SystemClock,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = ServerConfig::from_env()?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let store = open_store(&config).await?;
    let hasher = Arc::new(Argon2Hasher::new(config.hash_params)?);

    info!(
        addr = %config.socket_addr(),
        token_ttl_secs = config.token_ttl.num_seconds(),
        argon2_m = config.hash_params.memory_kib,
        argon2_t = config.hash_params.iterations,
        argon2_p = config.hash_params.parallelism,
        "Starting Lockbox server"
    );

    let addr = config.socket_addr();
    let state = Arc::new(AppState::new(&config, store, hasher, Arc::new(SystemClock))?);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "Lockbox listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Lockbox stopped");
    Ok(())
}

async fn open_store(config: &ServerConfig) -> Result<Arc<dyn Store>, Box<dyn Error>> {
    match config.storage_backend()? {
        #[cfg(feature = "postgres")]
        StorageBackend::Postgres(url) => {
            let store = lockbox_server::storage::PostgresStore::new(&url).await?;
            info!("Using PostgreSQL storage");
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "postgres"))]
        StorageBackend::Postgres(_) => Err("postgres support is not compiled in".into()),
        StorageBackend::Memory => {
            info!("Using in-memory storage");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
