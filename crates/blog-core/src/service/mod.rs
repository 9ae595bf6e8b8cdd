//! Blog service - validates input, maps each operation onto store primitives
//! and translates store outcomes into [`ServiceError`]s.
//!
//! The service keeps no state between calls besides the injected store.

mod paginator;

use std::sync::Arc;

use crate::domain::{BlogFields, BlogId, BlogPost};
use crate::error::ServiceError;
use crate::ports::{BlogStore, DeleteOutcome, UpdateOutcome};

pub use paginator::BlogStream;

/// Tunables for [`BlogService`].
#[derive(Debug, Clone)]
pub struct BlogServiceConfig {
    /// Capacity of the channel between the list paginator and its consumer.
    pub list_buffer: usize,
}

impl Default for BlogServiceConfig {
    fn default() -> Self {
        Self { list_buffer: 32 }
    }
}

/// The five blog operations.
#[derive(Clone)]
pub struct BlogService {
    store: Arc<dyn BlogStore>,
    config: BlogServiceConfig,
}

impl BlogService {
    pub fn new(store: Arc<dyn BlogStore>) -> Self {
        Self::with_config(store, BlogServiceConfig::default())
    }

    pub fn with_config(store: Arc<dyn BlogStore>, config: BlogServiceConfig) -> Self {
        Self { store, config }
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Store a new post under a freshly minted id.
    pub async fn create(&self, fields: BlogFields) -> Result<BlogPost, ServiceError> {
        let post = BlogPost::new(fields);
        tracing::debug!(blog_id = %post.id, "Creating blog");

        self.store
            .put(&post)
            .await
            .map_err(|e| ServiceError::store_fault("send blog to store", e))?;

        tracing::info!(blog_id = %post.id, "Blog created");
        Ok(post)
    }

    pub async fn read(&self, id: &str) -> Result<BlogPost, ServiceError> {
        let id = BlogId::parse(id)?;
        tracing::debug!(blog_id = %id, "Reading blog");

        self.store
            .get(&id)
            .await
            .map_err(|e| ServiceError::store_fault("get blog from store", e))?
            .ok_or_else(|| ServiceError::not_found(&id))
    }

    /// Overwrite the fields of an existing post.
    ///
    /// Returns the post as supplied; the store is not re-read after the write.
    pub async fn update(&self, id: &str, fields: BlogFields) -> Result<BlogPost, ServiceError> {
        let id = BlogId::parse(id)?;
        tracing::debug!(blog_id = %id, "Updating blog");

        let outcome = self
            .store
            .conditional_update(&id, &fields)
            .await
            .map_err(|e| ServiceError::store_fault("update blog in store", e))?;

        match outcome {
            UpdateOutcome::Updated => {
                tracing::info!(blog_id = %id, "Blog updated");
                Ok(BlogPost::with_id(id, fields))
            }
            UpdateOutcome::NotExists => Err(ServiceError::update_precondition(&id)),
        }
    }

    /// Remove a post and return its id.
    pub async fn delete(&self, id: &str) -> Result<BlogId, ServiceError> {
        let id = BlogId::parse(id)?;
        tracing::debug!(blog_id = %id, "Deleting blog");

        let outcome = self
            .store
            .delete(&id)
            .await
            .map_err(|e| ServiceError::store_fault("delete blog from store", e))?;

        match outcome {
            DeleteOutcome::Deleted(old) => {
                tracing::info!(blog_id = %old.id, title = %old.title, "Blog deleted");
                Ok(id)
            }
            DeleteOutcome::NotExists => Err(ServiceError::not_found(&id)),
        }
    }

    /// Stream every post in the store.
    ///
    /// Must be called from within a Tokio runtime. Dropping the returned
    /// stream stops the scan.
    pub fn list(&self) -> BlogStream {
        paginator::spawn(self.store.clone(), self.config.list_buffer)
    }
}
