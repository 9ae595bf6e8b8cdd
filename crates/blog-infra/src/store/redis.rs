//! Redis blog store - one hash per post, scanned with `SCAN`.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisError, Script};

use blog_core::ports::{BlogStore, DeleteOutcome, PageCursor, ScanPage, UpdateOutcome};
use blog_core::{BlogFields, BlogId, BlogPost, StoreError};

/// Writes the three mutable fields only when the hash already exists.
const CONDITIONAL_UPDATE: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 1 then
    redis.call('HSET', KEYS[1], 'author_id', ARGV[1], 'title', ARGV[2], 'content', ARGV[3])
    return 1
end
return 0
"#;

/// Redis store configuration.
#[derive(Debug, Clone)]
pub struct RedisStoreConfig {
    /// Redis URL (e.g., redis://localhost:6379)
    pub url: String,
    /// Keys are `{key_prefix}:{id}`
    pub key_prefix: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// `COUNT` hint passed to `SCAN`
    pub scan_count: usize,
}

impl Default for RedisStoreConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: "blog".to_string(),
            connect_timeout: Duration::from_secs(5),
            scan_count: 100,
        }
    }
}

/// Redis-backed blog store.
///
/// Uses connection manager for automatic reconnection. `SCAN` gives no
/// snapshot: posts written during a list may or may not appear, and a post
/// may be reported by more than one page. The list paginator drops repeats.
pub struct RedisBlogStore {
    conn: ConnectionManager,
    config: RedisStoreConfig,
    update_script: Script,
}

impl RedisBlogStore {
    pub async fn new(config: RedisStoreConfig) -> Result<Self, StoreError> {
        let client =
            Client::open(config.url.as_str()).map_err(|e| StoreError::Connection(e.to_string()))?;

        // Use timeout to prevent hanging if Redis is unreachable
        let conn = tokio::time::timeout(config.connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| StoreError::Connection("Connection timed out".to_string()))?
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        tracing::info!(url = %config.url, prefix = %config.key_prefix, "Connected to Redis blog store");

        Ok(Self {
            conn,
            config,
            update_script: Script::new(CONDITIONAL_UPDATE),
        })
    }

    fn key(&self, id: &BlogId) -> String {
        format!("{}:{}", self.config.key_prefix, id)
    }

    fn pattern(&self) -> String {
        format!("{}:*", escape_glob(&self.config.key_prefix))
    }
}

/// Escape the characters `SCAN MATCH` treats as glob syntax.
fn escape_glob(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len());
    for c in literal.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn store_error(e: RedisError) -> StoreError {
    if e.is_io_error() || e.is_connection_dropped() || e.is_connection_refusal() || e.is_timeout()
    {
        StoreError::Connection(e.to_string())
    } else {
        StoreError::Query(e.to_string())
    }
}

/// Rebuild a post from its hash. An empty hash means the key does not exist.
fn from_hash(mut hash: HashMap<String, String>) -> Result<Option<BlogPost>, StoreError> {
    if hash.is_empty() {
        return Ok(None);
    }

    let mut field = |name: &str| {
        hash.remove(name)
            .ok_or_else(|| StoreError::Malformed(format!("blog hash is missing '{name}'")))
    };

    let id = BlogId::parse(&field("id")?).map_err(|e| StoreError::Malformed(e.to_string()))?;
    let fields = BlogFields {
        author_id: field("author_id")?,
        title: field("title")?,
        content: field("content")?,
    };

    Ok(Some(BlogPost::with_id(id, fields)))
}

#[async_trait]
impl BlogStore for RedisBlogStore {
    async fn get(&self, id: &BlogId) -> Result<Option<BlogPost>, StoreError> {
        let mut conn = self.conn.clone();
        let hash: HashMap<String, String> =
            conn.hgetall(self.key(id)).await.map_err(store_error)?;
        from_hash(hash)
    }

    async fn put(&self, post: &BlogPost) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let id = post.id.to_string();
        let fields = [
            ("id", id.as_str()),
            ("author_id", post.author_id.as_str()),
            ("title", post.title.as_str()),
            ("content", post.content.as_str()),
        ];

        conn.hset_multiple::<_, _, _, ()>(self.key(&post.id), &fields[..])
            .await
            .map_err(store_error)
    }

    async fn conditional_update(
        &self,
        id: &BlogId,
        fields: &BlogFields,
    ) -> Result<UpdateOutcome, StoreError> {
        let mut conn = self.conn.clone();
        let applied: i64 = self
            .update_script
            .key(self.key(id))
            .arg(&fields.author_id)
            .arg(&fields.title)
            .arg(&fields.content)
            .invoke_async(&mut conn)
            .await
            .map_err(store_error)?;

        Ok(if applied == 1 {
            UpdateOutcome::Updated
        } else {
            UpdateOutcome::NotExists
        })
    }

    async fn delete(&self, id: &BlogId) -> Result<DeleteOutcome, StoreError> {
        let mut conn = self.conn.clone();
        let key = self.key(id);

        let (old, _removed): (HashMap<String, String>, i64) = redis::pipe()
            .atomic()
            .hgetall(&key)
            .del(&key)
            .query_async(&mut conn)
            .await
            .map_err(store_error)?;

        Ok(match from_hash(old)? {
            Some(post) => DeleteOutcome::Deleted(post),
            None => DeleteOutcome::NotExists,
        })
    }

    async fn scan_page(&self, cursor: Option<&PageCursor>) -> Result<ScanPage, StoreError> {
        let mut conn = self.conn.clone();
        let position: u64 = match cursor {
            Some(cursor) => cursor
                .as_str()
                .parse()
                .map_err(|_| StoreError::Malformed(format!("scan cursor {:?}", cursor.as_str())))?,
            None => 0,
        };

        let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
            .arg(position)
            .arg("MATCH")
            .arg(self.pattern())
            .arg("COUNT")
            .arg(self.config.scan_count)
            .query_async(&mut conn)
            .await
            .map_err(store_error)?;

        let mut items = Vec::with_capacity(keys.len());
        if !keys.is_empty() {
            let mut pipe = redis::pipe();
            for key in &keys {
                pipe.hgetall(key);
            }
            let hashes: Vec<HashMap<String, String>> =
                pipe.query_async(&mut conn).await.map_err(store_error)?;

            // Keys deleted between SCAN and HGETALL come back empty.
            for hash in hashes {
                if let Some(post) = from_hash(hash)? {
                    items.push(post);
                }
            }
        }

        let next = (next != 0).then(|| PageCursor::new(next.to_string()));
        Ok(ScanPage { items, next })
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
