//! Food Ordering Backend Library
//!
//! Account registration and login, the menu listing and the static pages of a
//! small food-ordering site, backed by SQLite through SeaORM.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod middleware_helpers;
pub mod migrator;
pub mod seed;
pub mod services;
pub mod tracing;

use axum::{
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use std::{path::Path, sync::Arc};
use tower_http::services::ServeFile;

use crate::services::{AccountService, ActivityRecorder, CatalogService};

/// Page served on `/`
pub const LOGIN_PAGE: &str = "authentication.html";
/// Page served on `/main`
pub const MAIN_PAGE: &str = "main.html";
/// Page served on `/admin`
pub const ADMIN_PAGE: &str = "admin.html";

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub accounts: AccountService,
    pub catalog: CatalogService,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let activity = ActivityRecorder::new(db.clone());
        Self {
            accounts: AccountService::new(db.clone(), activity),
            catalog: CatalogService::new(db.clone()),
            db,
            config,
        }
    }
}

/// JSON endpoints
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/register", post(handlers::auth::register))
        .route("/menu", get(handlers::menu::list_menu))
        .route("/health", get(handlers::health::health_check))
}

/// HTML pages read from `static_dir` on every request
pub fn page_routes(static_dir: &Path) -> Router<AppState> {
    Router::new()
        .route_service("/", ServeFile::new(static_dir.join(LOGIN_PAGE)))
        .route_service("/main", ServeFile::new(static_dir.join(MAIN_PAGE)))
        .route_service("/admin", ServeFile::new(static_dir.join(ADMIN_PAGE)))
}

/// Full application router with request-id propagation and HTTP tracing
pub fn app_router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    page_routes(Path::new(&static_dir))
        .merge(api_routes())
        .layer(crate::tracing::configure_http_tracing())
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id_middleware,
        ))
        .with_state(state)
}
