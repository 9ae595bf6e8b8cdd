//! # Blog Infrastructure
//!
//! Concrete implementations of the `BlogStore` port defined in `blog-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All backends enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL backend via SeaORM
//! - `redis` - Redis backend

pub mod database;
pub mod store;

// Re-exports - In-Memory
pub use database::DatabaseConfig;
pub use store::InMemoryBlogStore;

#[cfg(feature = "postgres")]
pub use database::PostgresBlogStore;

// Re-exports - Redis
#[cfg(feature = "redis")]
pub use store::{RedisBlogStore, RedisStoreConfig};
