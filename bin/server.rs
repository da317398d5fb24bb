// Potluck Registry - Web Server

use anyhow::{Context, Result};
use potluck_registry::{build_router, AdminGate, AppState, EntryStore, Potluck, ServerConfig};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env().context("Invalid configuration")?;
    init_tracing(config.log_json);

    info!(version = potluck_registry::VERSION, "🍛 Potluck Registry - Web Server");
    if config.default_password {
        warn!("POTLUCK_ADMIN_PASSWORD not set, using the built-in default");
    }

    // Open the store once; every handler shares it through AppState
    let store = EntryStore::open(
        &config.data_file,
        Arc::new(config.categories.clone()),
        config.lock_timeout,
    )
    .with_context(|| format!("Failed to open entry store {}", config.data_file.display()))?;

    let retired = store.audit().context("Failed to read entry store")?;
    info!(
        path = %store.path().display(),
        categories = config.categories.len(),
        retired = retired.len(),
        "✓ Entry store ready"
    );

    let potluck = Potluck::new(Arc::new(store), AdminGate::new(&config.admin_password));
    let app = build_router(AppState {
        potluck: Arc::new(potluck),
    });

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    info!(addr = %config.bind, "🚀 Server running");
    axum::serve(listener, app)
        .await
        .context("Server terminated")?;

    Ok(())
}
