//! # Blog Shared
//!
//! Wire types shared between the blog server and its clients.
//! Kept free of server dependencies so clients can depend on it alone.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
