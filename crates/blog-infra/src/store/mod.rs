//! Key-value blog stores - in-memory and Redis.

mod memory;

#[cfg(feature = "redis")]
mod redis;

pub use memory::{DEFAULT_PAGE_SIZE, InMemoryBlogStore};

#[cfg(feature = "redis")]
pub use redis::{RedisBlogStore, RedisStoreConfig};
