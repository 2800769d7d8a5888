//! E-print browse API server
//!
//! Serves article abstract pages, month listings, and render-availability
//! links for an e-print archive.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use eprint::LatexmlConfig;
use eprint_server::{
    AppState, backends::Backends, config::ServerConfig, create_router,
    error::{ApiError, Result},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "eprint_server=debug,tower_http=debug".to_string()),
        )
        .init();

    // Load configuration
    let config = ServerConfig::from_env()?;
    info!(
        "Starting eprint server on {}:{} ({:?} backend)",
        config.host, config.port, config.document_backend
    );

    // Compose backends per configuration
    let backends = Backends::from_config(&config).await?;
    let latexml = Arc::new(LatexmlConfig {
        enabled: config.latexml_enabled,
        base_url: config.latexml_base_url.clone(),
    });

    // Create application state
    let state = AppState {
        backends,
        latexml,
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|_| ApiError::Config("Invalid HOST/PORT combination".to_string()))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
