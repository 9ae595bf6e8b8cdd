//! # Blog Core
//!
//! The domain layer of the blog service.
//! This crate contains the blog entity, the identifier policy, the store port
//! and the service that maps each operation onto store primitives. It has
//! zero infrastructure dependencies; backends live in `blog-infra`.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use domain::{BlogFields, BlogId, BlogPost};
pub use error::{ErrorCode, ServiceError, StoreError};
pub use service::{BlogService, BlogServiceConfig, BlogStream};
