use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, require_admin_key, require_reader_key, trace_id,
};
use crate::routes::{
    assets, dashboard, health, locations, reader_config, reader_logs, readers, tags,
};
use crate::services::Directory;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub directory: Arc<Directory>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    let directory = Arc::new(Directory::new(
        pool.clone(),
        Duration::from_secs(config.ingestion.reader_cache_ttl_secs),
        Duration::from_secs(config.ingestion.asset_cache_ttl_secs),
    ));

    let state = AppState {
        pool,
        config: config.clone(),
        directory,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Reader-facing routes, gated by the X-Reader-Key shared secret
    let reader_routes = Router::new()
        .route("/api/v1/reader-config", get(reader_config::get_reader_config))
        .route("/api/v1/reader-log", post(reader_logs::record_log))
        .route("/api/v1/reader-logs", post(reader_logs::record_logs))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_reader_key,
        ));

    // Management routes, gated by the X-Admin-Key shared secret
    let admin_routes = Router::new()
        // Locations
        .route("/api/v1/locations", get(locations::list_locations))
        .route("/api/v1/locations", post(locations::create_location))
        .route("/api/v1/locations/:id", get(locations::get_location))
        .route("/api/v1/locations/:id", put(locations::update_location))
        .route("/api/v1/locations/:id", delete(locations::delete_location))
        // Tags
        .route("/api/v1/tags", get(tags::list_tags))
        .route("/api/v1/tags", post(tags::create_tag))
        .route("/api/v1/tags/:id", put(tags::update_tag))
        .route("/api/v1/tags/:id", delete(tags::delete_tag))
        // Readers
        .route("/api/v1/readers", get(readers::list_readers))
        .route("/api/v1/readers", post(readers::create_reader))
        .route("/api/v1/readers/:id", get(readers::get_reader))
        .route("/api/v1/readers/:id", put(readers::update_reader))
        .route("/api/v1/readers/:id", delete(readers::delete_reader))
        // Assets
        .route("/api/v1/assets", get(assets::list_assets))
        .route("/api/v1/assets", post(assets::create_asset))
        .route("/api/v1/assets/:id", get(assets::get_asset))
        .route("/api/v1/assets/:id", put(assets::update_asset))
        .route("/api/v1/assets/:id", delete(assets::delete_asset))
        .route("/api/v1/assets/:id/logs", get(assets::get_asset_logs))
        // Dashboard
        .route("/api/v1/dashboard", get(dashboard::get_dashboard))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin_key,
        ));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(reader_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
