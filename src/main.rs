use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use api_rest::AppState;
use pdfstore_core::{
    body_limit_from_env_value, cors_policy_from_env_value, port_from_env_value,
    storage_dir_from_env_value, CoreConfig, CORS_ORIGIN_ENV, DEFAULT_LOG_DIRECTIVES,
    MAX_UPLOAD_BYTES_ENV, PORT_ENV, STORAGE_DIR_ENV,
};
use pdfstore_files::FileStore;

/// Main entry point for the PDF store
///
/// Resolves configuration once, creates the storage root, and serves the REST API until
/// interrupted.
///
/// # Environment Variables
/// - `PDFSTORE_STORAGE_DIR`: storage root (default: "storage", created if missing)
/// - `PORT`: listen port on all interfaces (default: 8000)
/// - `PDFSTORE_CORS_ORIGIN`: `*` or comma-separated allowed origins (default: "*")
/// - `PDFSTORE_MAX_UPLOAD_BYTES`: request body limit (default: 50 MiB)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - any configuration value is invalid,
/// - the storage root cannot be created,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(env_filter()?)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Arc::new(CoreConfig::new(
        storage_dir_from_env_value(std::env::var(STORAGE_DIR_ENV).ok()),
        port_from_env_value(std::env::var(PORT_ENV).ok())?,
        cors_policy_from_env_value(std::env::var(CORS_ORIGIN_ENV).ok())?,
        body_limit_from_env_value(std::env::var(MAX_UPLOAD_BYTES_ENV).ok())?,
    )?);

    let store = FileStore::new(cfg.storage_dir())?;
    tracing::info!("++ Storage root {}", store.root_directory().display());

    let app = api_rest::router(AppState::new(store, cfg.clone()))?;

    let addr = cfg.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("++ Starting PDF store REST on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- PDF store stopped");
    Ok(())
}

/// `RUST_LOG` plus the crate-level defaults, including request/response logs from `tower_http`.
fn env_filter() -> anyhow::Result<EnvFilter> {
    DEFAULT_LOG_DIRECTIVES
        .iter()
        .try_fold(EnvFilter::from_default_env(), |filter, directive| {
            Ok::<_, anyhow::Error>(filter.add_directive(directive.parse()?))
        })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_logs_http_responses() {
        let filter = env_filter().unwrap().to_string();

        assert!(filter.contains("tower_http=info"));
        assert!(filter.contains("api_rest=info"));
        assert!(filter.contains("pdfstore_files=info"));
    }
}
