//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::ports::BlogStore;
use blog_core::{BlogService, BlogServiceConfig, StoreError};
use blog_infra::InMemoryBlogStore;

use crate::config::{AppConfig, StoreBackend, StoreConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blogs: BlogService,
}

impl AppState {
    /// Build the application state with the configured store.
    pub async fn new(config: &AppConfig) -> Result<Self, StoreError> {
        let store = build_store(&config.store).await?;
        tracing::info!(backend = store.backend(), "Application state initialized");

        Ok(Self::with_store(
            store,
            BlogServiceConfig {
                list_buffer: config.list_buffer,
            },
        ))
    }

    pub fn with_store(store: Arc<dyn BlogStore>, config: BlogServiceConfig) -> Self {
        Self {
            blogs: BlogService::with_config(store, config),
        }
    }
}

async fn build_store(config: &StoreConfig) -> Result<Arc<dyn BlogStore>, StoreError> {
    if config.local {
        tracing::info!(backend = %config.backend, "Using local store endpoint");
    }

    match config.backend {
        StoreBackend::Memory => {
            tracing::warn!("Running with the in-memory store; data is lost on restart");
            Ok(Arc::new(InMemoryBlogStore::with_page_size(config.page_size)))
        }

        #[cfg(feature = "redis")]
        StoreBackend::Redis => {
            let redis = blog_infra::RedisStoreConfig {
                url: endpoint(config)?,
                key_prefix: config.redis_key_prefix.clone(),
                connect_timeout: config.connect_timeout,
                scan_count: config.page_size,
            };
            Ok(Arc::new(blog_infra::RedisBlogStore::new(redis).await?))
        }

        #[cfg(feature = "postgres")]
        StoreBackend::Postgres => {
            let mut database = blog_infra::DatabaseConfig::new(endpoint(config)?);
            database.max_connections = config.db_max_connections;
            database.min_connections = config.db_min_connections;
            database.connect_timeout = config.connect_timeout;
            database.page_size = config.page_size as u64;

            let conn = blog_infra::database::connect(&database)
                .await
                .map_err(|e| StoreError::Connection(e.to_string()))?;
            Ok(Arc::new(blog_infra::PostgresBlogStore::new(
                conn,
                database.page_size,
            )))
        }

        #[allow(unreachable_patterns)]
        other => Err(StoreError::Connection(format!(
            "{other} backend is not compiled into this build"
        ))),
    }
}

#[cfg(any(feature = "redis", feature = "postgres"))]
fn endpoint(config: &StoreConfig) -> Result<String, StoreError> {
    config
        .url
        .clone()
        .ok_or_else(|| StoreError::Connection(format!("no endpoint for {}", config.backend)))
}
