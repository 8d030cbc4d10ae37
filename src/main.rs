//! USA Status Backend
//!
//! Reports whether the U.S. federal government is currently shut down, backed by a
//! curated table of historical funding lapses.

mod api;
mod config;
mod edge;
mod errors;
mod models;
mod status;
mod store;

use std::sync::Arc;

use axum::{http::Method, middleware, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use errors::AppError;
use status::{Clock, SystemClock};
use store::ShutdownStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ShutdownStore>,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting USA Status Backend");
    tracing::info!("Bind address: {}", config.bind_addr);
    match &config.data_path {
        Some(path) => tracing::info!("Data source: {:?}", path),
        None => tracing::info!("Data source: packaged table"),
    }
    if let Some(dir) = &config.static_dir {
        tracing::info!("Static assets: {:?}", dir);
    }

    // Load shutdown records once; they are read-only from here on
    let store = ShutdownStore::load(config.data_path.as_deref()).await?;
    let ongoing: Vec<&str> = store.ongoing().map(|r| r.id.as_str()).collect();
    tracing::info!(
        "Loaded {} shutdown records; ongoing: {:?}",
        store.len(),
        ongoing
    );
    if !store.unreadable_ongoing().is_empty() {
        tracing::warn!(
            "Unreadable rows without an end count as ongoing: {:?}",
            store.unreadable_ongoing()
        );
    } else if store.is_empty() {
        tracing::warn!("No shutdown records loaded; status will always report 200");
    }

    let state = AppState {
        store: Arc::new(store),
        clock: Arc::new(SystemClock),
        config: Arc::new(config.clone()),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/status", get(api::get_status))
        .route("/shutdowns", get(api::list_shutdowns))
        .route("/shutdowns/{id}", get(api::get_shutdown))
        .fallback(api_not_found);

    let mut router = Router::new()
        .route(edge::STATUS_PATH, get(api::get_down))
        .route("/health", get(health_check))
        .nest("/api", api_routes);

    if let Some(dir) = &state.config.static_dir {
        router = router.fallback_service(edge::static_assets(dir));
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(edge::relay))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

async fn api_not_found() -> AppError {
    AppError::NotFound("No such API route".to_string())
}
