//! E-print browse HTTP server
//!
//! Serves article abstract pages and month listings over REST, with
//! optional links to LaTeXML-converted HTML papers. The backends the
//! application reads from are composed explicitly at construction time;
//! see [`backends::Backends`].

use std::sync::Arc;

use axum::{Router, response::Json, routing::get};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod backends;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;

use backends::Backends;
use config::ServerConfig;
use eprint::LatexmlConfig;
use error::Result;

/// Main application state
#[derive(Clone)]
pub struct AppState {
    pub backends: Backends,
    pub latexml: Arc<LatexmlConfig>,
    pub config: ServerConfig,
}

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Page routes
        .nest("/abs", routes::abs::router())
        .nest("/list", routes::list::router())
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> Result<Json<Value>> {
    Ok(Json(json!({
        "status": "healthy",
        "service": "eprint-server",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": time::OffsetDateTime::now_utc()
    })))
}
