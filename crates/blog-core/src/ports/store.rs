use async_trait::async_trait;

use crate::domain::{BlogFields, BlogId, BlogPost};
use crate::error::StoreError;

/// Opaque continuation token for [`BlogStore::scan_page`].
///
/// Only the adapter that minted a cursor knows what it means; callers hand it
/// back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor(String);

impl PageCursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One page of a full-table scan.
#[derive(Debug, Clone, Default)]
pub struct ScanPage {
    pub items: Vec<BlogPost>,
    /// `None` once the scan is exhausted.
    pub next: Option<PageCursor>,
}

/// Result of a conditional write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    /// The record did not exist, so nothing was written.
    NotExists,
}

/// Result of a delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The record existed; these were its attributes.
    Deleted(BlogPost),
    NotExists,
}

/// Blog store trait - abstraction over key-value backends (Redis, PostgreSQL, in-memory).
///
/// Each call is a single round trip. Implementations must be safe for
/// concurrent use and must not cache records locally.
#[async_trait]
pub trait BlogStore: Send + Sync {
    /// Fetch a record. Absence is `Ok(None)`, not an error.
    async fn get(&self, id: &BlogId) -> Result<Option<BlogPost>, StoreError>;

    /// Unconditional insert or replace.
    async fn put(&self, post: &BlogPost) -> Result<(), StoreError>;

    /// Overwrite the three mutable fields only if `id` exists.
    async fn conditional_update(
        &self,
        id: &BlogId,
        fields: &BlogFields,
    ) -> Result<UpdateOutcome, StoreError>;

    /// Remove a record and return what was removed.
    async fn delete(&self, id: &BlogId) -> Result<DeleteOutcome, StoreError>;

    /// Fetch the page after `cursor`, or the first page when `cursor` is `None`.
    async fn scan_page(&self, cursor: Option<&PageCursor>) -> Result<ScanPage, StoreError>;

    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;
}
