pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod movies;
pub mod routes;
pub mod users;

use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use config::{Settings, StorageBackend};

pub use auth::{AuthService, Identity};
pub use db::{CredentialStore, MemoryStore, MovieStore, PgStore, UserStore};
pub use routes::{configure, health_check};

/// Application state shared across all components
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub users: Arc<dyn UserStore>,
    pub movies: Arc<dyn MovieStore>,
    pub auth: Arc<AuthService>,
    pg: Option<PgStore>,
}

impl AppState {
    /// Connect the configured storage backend and build the authentication core over it.
    pub async fn new(config: Settings) -> Result<Self> {
        match config.database.backend {
            StorageBackend::Memory => Ok(Self::in_memory(config)),
            StorageBackend::Postgres => {
                let store = PgStore::connect(
                    &config.database.url,
                    config.database.max_connections,
                    Duration::from_secs(config.database.acquire_timeout_secs),
                )
                .await?;
                store.migrate().await?;
                info!("Connected to PostgreSQL");

                let auth = AuthService::new(Arc::new(store.clone()), &config.auth);
                Ok(Self {
                    config: Arc::new(config),
                    users: Arc::new(store.clone()),
                    movies: Arc::new(store.clone()),
                    auth: Arc::new(auth),
                    pg: Some(store),
                })
            }
        }
    }

    pub fn in_memory(config: Settings) -> Self {
        let store = MemoryStore::new();
        let auth = AuthService::new(Arc::new(store.clone()), &config.auth);
        Self {
            config: Arc::new(config),
            users: Arc::new(store.clone()),
            movies: Arc::new(store),
            auth: Arc::new(auth),
            pg: None,
        }
    }

    pub async fn shutdown(&self) -> Result<()> {
        if let Some(store) = &self.pg {
            store.close().await;
        }
        Ok(())
    }
}
