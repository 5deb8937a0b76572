//! odoo-fhir - FHIR R4 facade over Odoo
//!
//! Exposes Odoo products, partners and quotations as FHIR resources,
//! talking to Odoo over XML-RPC with the caller's own credentials.

pub mod audit;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod locks;
pub mod services;

use axum::{
    Router,
    http::Method,
    routing::get,
};
use odoo_fhir_store::{AuditLog, Connector};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

/// Application state
pub struct AppState {
    pub config: config::ServerConfig,
    pub connector: Arc<dyn Connector>,
    pub sessions: RwLock<auth::SessionCache>,
    pub audit: Arc<Mutex<AuditLog>>,
    pub shared: Arc<services::Shared>,
}

impl AppState {
    pub fn new(config: config::ServerConfig, connector: Arc<dyn Connector>, audit: AuditLog) -> Self {
        Self {
            sessions: RwLock::new(auth::SessionCache::new(config.session_ttl())),
            shared: Arc::new(services::Shared::from_config(&config)),
            audit: Arc::new(Mutex::new(audit)),
            connector,
            config,
        }
    }
}

/// Build the application router with all routes and middleware
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let fhir = Router::new()
        .route("/health", get(handlers::metadata::health_check))
        .route("/metadata", get(handlers::metadata::capability_statement))
        .route(
            "/{resource_type}",
            get(handlers::search::search).post(handlers::crud::create),
        )
        .route("/{resource_type}/{id}", get(handlers::crud::read))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    let base_path = state.config.base_path();
    let router = if base_path.is_empty() {
        Router::new().merge(fhir)
    } else {
        Router::new().nest(&base_path, fhir)
    };

    router
        .layer(RequestBodyLimitLayer::new(4 * 1024 * 1024)) // 4MB
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
