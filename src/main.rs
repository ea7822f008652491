// src/main.rs

use std::time::Duration;

use dotenvy::dotenv;
use movie_catalog::config::Config;
use movie_catalog::routes;
use movie_catalog::state::AppState;
use movie_catalog::store::{self, SharedStore};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const STARTUP_ATTEMPTS: u32 = 5;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env()?;

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Open the store and wait for it to answer
    let store = connect_with_retry(&config).await?;
    tracing::info!("Store ready ({:?})", config.storage);

    let state = AppState {
        store,
        config: config.clone(),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    // Start the server
    axum::serve(listener, app).await?;
    Ok(())
}

/// Startup only: the request path itself never retries.
async fn connect_with_retry(config: &Config) -> Result<SharedStore, Box<dyn std::error::Error>> {
    let store = store::connect(config).await?;

    let mut attempt = 0;
    loop {
        match store.ping().await {
            Ok(()) => return Ok(store),
            Err(e) => {
                attempt += 1;
                if attempt >= STARTUP_ATTEMPTS {
                    return Err(format!(
                        "Failed to reach database after {} attempts: {}",
                        attempt, e
                    )
                    .into());
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", attempt);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    }
}
