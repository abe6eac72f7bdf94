pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod notes;

use actix_web::{web, HttpResponse};
use std::sync::Arc;
use tracing::{info, warn};

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use config::Settings;

pub use auth::{AuthService, CredentialHasher, CurrentUser, TokenCodec};
pub use db::{DbOperations, MemoryStore, Note, Store, User};

const MEMORY_URL_PREFIX: &str = "memory://";

/// Health check endpoint handler
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok"
    }))
}

/// Registers every route. Shared by the binary and the integration tests.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/token", web::post().to(auth::handlers::login))
        .route("/users/", web::post().to(auth::handlers::register))
        .route("/users/me/", web::get().to(auth::handlers::me))
        .route("/notes/", web::post().to(notes::create_note))
        .route("/notes/", web::get().to(notes::list_notes));
}

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    /// Connects the store named by `database.url` and wires the auth
    /// service on top of it.
    pub async fn new(config: Settings) -> Result<Self> {
        let store: Arc<dyn Store> = if config.database.url.starts_with(MEMORY_URL_PREFIX) {
            warn!("Using in-memory store; data will not survive a restart");
            Arc::new(MemoryStore::new())
        } else {
            let db = DbOperations::from_config(&config.database).await?;
            db.migrate().await?;
            info!("Connected to database");
            Arc::new(db)
        };

        Self::with_store(config, store)
    }

    pub fn with_store(config: Settings, store: Arc<dyn Store>) -> Result<Self> {
        let auth = AuthService::new(store.clone(), &config.auth)?;

        Ok(Self {
            store,
            auth: Arc::new(auth),
        })
    }
}
