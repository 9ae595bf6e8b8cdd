//! In-memory blog store - used when no external backend is configured.

use std::collections::BTreeMap;
use std::ops::Bound;

use async_trait::async_trait;
use tokio::sync::RwLock;

use blog_core::ports::{BlogStore, DeleteOutcome, PageCursor, ScanPage, UpdateOutcome};
use blog_core::{BlogFields, BlogId, BlogPost, StoreError};

/// Default number of posts returned by one scan page.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// In-memory store using an ordered map with async RwLock.
///
/// Scans walk the map in id order; the cursor is the last id of the previous
/// page. Note: Data is lost on process restart.
pub struct InMemoryBlogStore {
    posts: RwLock<BTreeMap<BlogId, BlogPost>>,
    page_size: usize,
}

impl InMemoryBlogStore {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            posts: RwLock::new(BTreeMap::new()),
            page_size: page_size.max(1),
        }
    }

    pub async fn is_empty(&self) -> bool {
        self.posts.read().await.is_empty()
    }
}

impl Default for InMemoryBlogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlogStore for InMemoryBlogStore {
    async fn get(&self, id: &BlogId) -> Result<Option<BlogPost>, StoreError> {
        Ok(self.posts.read().await.get(id).cloned())
    }

    async fn put(&self, post: &BlogPost) -> Result<(), StoreError> {
        self.posts.write().await.insert(post.id, post.clone());
        Ok(())
    }

    async fn conditional_update(
        &self,
        id: &BlogId,
        fields: &BlogFields,
    ) -> Result<UpdateOutcome, StoreError> {
        let mut posts = self.posts.write().await;
        let Some(post) = posts.get_mut(id) else {
            return Ok(UpdateOutcome::NotExists);
        };

        post.author_id = fields.author_id.clone();
        post.title = fields.title.clone();
        post.content = fields.content.clone();
        Ok(UpdateOutcome::Updated)
    }

    async fn delete(&self, id: &BlogId) -> Result<DeleteOutcome, StoreError> {
        Ok(match self.posts.write().await.remove(id) {
            Some(post) => DeleteOutcome::Deleted(post),
            None => DeleteOutcome::NotExists,
        })
    }

    async fn scan_page(&self, cursor: Option<&PageCursor>) -> Result<ScanPage, StoreError> {
        let lower = match cursor {
            Some(cursor) => {
                let after = BlogId::parse(cursor.as_str())
                    .map_err(|e| StoreError::Malformed(format!("scan cursor: {e}")))?;
                Bound::Excluded(after)
            }
            None => Bound::Unbounded,
        };

        let posts = self.posts.read().await;
        let mut range = posts.range((lower, Bound::Unbounded));
        let items: Vec<BlogPost> = range
            .by_ref()
            .take(self.page_size)
            .map(|(_, post)| post.clone())
            .collect();

        // Only hand out a cursor if something follows this page.
        let next = match (items.last(), range.next()) {
            (Some(last), Some(_)) => Some(PageCursor::new(last.id.to_string())),
            _ => None,
        };

        Ok(ScanPage { items, next })
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str) -> BlogPost {
        BlogPost::new(BlogFields::new("author", title, "content"))
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let store = InMemoryBlogStore::new();
        let p = post("one");
        store.put(&p).await.unwrap();
        assert_eq!(store.get(&p.id).await.unwrap(), Some(p));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = InMemoryBlogStore::new();
        assert_eq!(store.get(&BlogId::generate()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_conditional_update_requires_existing() {
        let store = InMemoryBlogStore::new();
        let fields = BlogFields::new("a", "b", "c");

        let outcome = store
            .conditional_update(&BlogId::generate(), &fields)
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::NotExists);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_conditional_update_keeps_id() {
        let store = InMemoryBlogStore::new();
        let p = post("one");
        store.put(&p).await.unwrap();

        let fields = BlogFields::new("a", "", "c");
        let outcome = store.conditional_update(&p.id, &fields).await.unwrap();
        assert_eq!(outcome, UpdateOutcome::Updated);

        let stored = store.get(&p.id).await.unwrap().unwrap();
        assert_eq!(stored.id, p.id);
        assert_eq!(stored.fields(), fields);
    }

    #[tokio::test]
    async fn test_delete_returns_old_record() {
        let store = InMemoryBlogStore::new();
        let p = post("one");
        store.put(&p).await.unwrap();

        assert_eq!(
            store.delete(&p.id).await.unwrap(),
            DeleteOutcome::Deleted(p.clone())
        );
        assert_eq!(store.delete(&p.id).await.unwrap(), DeleteOutcome::NotExists);
    }

    #[tokio::test]
    async fn test_scan_pages() {
        let store = InMemoryBlogStore::with_page_size(2);
        for i in 0..5 {
            store.put(&post(&format!("p{i}"))).await.unwrap();
        }

        let first = store.scan_page(None).await.unwrap();
        assert_eq!(first.items.len(), 2);
        let second = store.scan_page(first.next.as_ref()).await.unwrap();
        assert_eq!(second.items.len(), 2);
        let third = store.scan_page(second.next.as_ref()).await.unwrap();
        assert_eq!(third.items.len(), 1);
        assert!(third.next.is_none());
    }

    #[tokio::test]
    async fn test_scan_exact_multiple_has_no_trailing_page() {
        let store = InMemoryBlogStore::with_page_size(2);
        for i in 0..4 {
            store.put(&post(&format!("p{i}"))).await.unwrap();
        }

        let first = store.scan_page(None).await.unwrap();
        let second = store.scan_page(first.next.as_ref()).await.unwrap();
        assert_eq!(second.items.len(), 2);
        assert!(second.next.is_none());
    }

    #[tokio::test]
    async fn test_scan_empty() {
        let store = InMemoryBlogStore::new();
        let page = store.scan_page(None).await.unwrap();
        assert!(page.items.is_empty());
        assert!(page.next.is_none());
    }

    #[tokio::test]
    async fn test_scan_rejects_foreign_cursor() {
        let store = InMemoryBlogStore::new();
        let err = store
            .scan_page(Some(&PageCursor::new("not-a-cursor")))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
    }
}
