//! Stream paginator - drives `scan_page` and forwards each page through a
//! bounded channel.
//!
//! The next page is fetched only after every item of the current page has been
//! queued, so a slow consumer holds the scan back. A dropped consumer closes the
//! channel and the producer stops at its next send or page fetch.
//!
//! Backends whose scans are not snapshots may report a post on more than one
//! page; each id is forwarded at most once per list.

use std::collections::HashSet;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

use crate::domain::{BlogId, BlogPost};
use crate::error::ServiceError;
use crate::ports::{BlogStore, PageCursor};

type Item = Result<BlogPost, ServiceError>;

/// Posts produced by a list call.
///
/// Yields `Ok` posts in the backend's scan order. A store fault ends the
/// stream with a single [`ServiceError::StreamAborted`] item.
pub struct BlogStream {
    rx: mpsc::Receiver<Item>,
}

impl BlogStream {
    pub async fn next_post(&mut self) -> Option<Item> {
        self.rx.recv().await
    }

    /// Drain the stream into a vector, stopping at the first error.
    pub async fn collect_all(mut self) -> Result<Vec<BlogPost>, ServiceError> {
        let mut posts = Vec::new();
        while let Some(item) = self.next_post().await {
            posts.push(item?);
        }
        Ok(posts)
    }
}

impl Stream for BlogStream {
    type Item = Item;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

pub(super) fn spawn(store: Arc<dyn BlogStore>, buffer: usize) -> BlogStream {
    let (tx, rx) = mpsc::channel(buffer.max(1));
    tokio::spawn(drive(store, tx));
    BlogStream { rx }
}

async fn drive(store: Arc<dyn BlogStore>, tx: mpsc::Sender<Item>) {
    let mut cursor: Option<PageCursor> = None;
    let mut pages = 0usize;
    let mut delivered = 0usize;
    let mut seen: HashSet<BlogId> = HashSet::new();

    loop {
        let page = tokio::select! {
            _ = tx.closed() => {
                tracing::debug!(pages, delivered, "List consumer gone, stopping scan");
                return;
            }
            page = store.scan_page(cursor.as_ref()) => page,
        };

        let page = match page {
            Ok(page) => page,
            Err(e) => {
                let _ = tx.send(Err(ServiceError::scan_aborted(delivered, e))).await;
                return;
            }
        };
        pages += 1;
        tracing::debug!(page = pages, items = page.items.len(), "Scanned page");

        for post in page.items {
            if !seen.insert(post.id) {
                tracing::debug!(blog_id = %post.id, "Skipping post already listed");
                continue;
            }
            if tx.send(Ok(post)).await.is_err() {
                tracing::debug!(pages, delivered, "List consumer gone, dropping page");
                return;
            }
            delivered += 1;
        }

        match page.next {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    tracing::debug!(pages, delivered, "List scan complete");
}
