//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

use crate::ErrorResponse;

/// Request to create a blog post.
///
/// Any `id` sent by the caller is ignored; the server mints one. Missing text
/// fields default to empty strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateBlogRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub author_id: String,
    pub title: String,
    pub content: String,
}

/// Request to replace the fields of an existing blog post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateBlogRequest {
    pub author_id: String,
    pub title: String,
    pub content: String,
}

/// A blog post as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogResponse {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub content: String,
}

/// Response to a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteBlogResponse {
    pub blog_id: String,
}

/// One line of the newline-delimited list stream.
///
/// Serialized as `{"blog": {...}}` per post. A stream cut short by a server
/// fault ends with a single `{"error": {...}}` line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListBlogFrame {
    Blog(BlogResponse),
    Error(ErrorResponse),
}
