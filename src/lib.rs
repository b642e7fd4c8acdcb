//! EmoGo mood-tracking API.
//!
//! The binary in `src/main.rs` wires configuration, logging and the store
//! connection; everything needed to build the router lives here so the
//! HTTP tests can drive it directly.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod store;
pub mod validation;

use config::Config;
use store::MoodRepo;

#[derive(Clone)]
pub struct AppState {
    pub repo: MoodRepo,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(repo: MoodRepo, config: Config) -> Self {
        Self {
            repo,
            config: Arc::new(config),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let upload_routes = Router::new()
        .route(
            "/api/records/upload/video",
            post(handlers::uploads::upload_video),
        )
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes));

    let api_routes = Router::new()
        .route(
            "/api/records",
            get(handlers::records::list_records).post(handlers::records::create_record),
        )
        .route("/api/records/:id", get(handlers::records::get_record))
        .route("/api/export/csv", get(handlers::export::export_csv))
        .route("/api/stats", get(handlers::stats::get_stats));

    let public_routes = Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz));

    let cors = cors_layer(&state.config);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .merge(upload_routes)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(hv) => Some(hv),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}
