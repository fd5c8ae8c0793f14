pub mod client;
pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::config::{Config, StorageBackend};
use crate::error::Result;
use crate::services::{
    application_service::ApplicationService, chat_service::ChatService,
    memory_storage::MemoryStorage, pg_storage::PgStorage, storage::Storage,
    upload_service::UploadService, user_service::UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub storage: Arc<dyn Storage>,
    pub user_service: UserService,
    pub application_service: ApplicationService,
    pub upload_service: UploadService,
    pub chat_service: ChatService,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<dyn Storage>) -> Self {
        let config = Arc::new(config);
        let user_service = UserService::new(storage.clone(), config.clone());
        let application_service =
            ApplicationService::new(storage.clone(), config.allow_duplicate_applications);
        let upload_service =
            UploadService::new(config.uploads_dir.clone(), config.max_upload_bytes);
        let chat_service = ChatService::new(config.chat_reply_delay_ms);

        Self {
            config,
            storage,
            user_service,
            application_service,
            upload_service,
            chat_service,
        }
    }
}

/// Opens the configured backend. Postgres connections are migrated before use.
pub async fn connect_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    match config.storage_backend {
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage; data is lost on restart");
            Ok(Arc::new(MemoryStorage::new()))
        }
        StorageBackend::Postgres => {
            let pool = database::pool::create_pool(config).await?;
            database::pool::run_migrations(&pool).await?;
            Ok(Arc::new(PgStorage::new(pool)))
        }
    }
}
