use serde::{Deserialize, Serialize};

use super::BlogId;

/// The caller-editable part of a blog post.
///
/// Update writes all three fields as a unit. Empty strings are valid values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogFields {
    pub author_id: String,
    pub title: String,
    pub content: String,
}

impl BlogFields {
    pub fn new(
        author_id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            author_id: author_id.into(),
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Blog post entity - the only record kept in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: BlogId,
    pub author_id: String,
    pub title: String,
    pub content: String,
}

impl BlogPost {
    /// Create a new post with a freshly minted id.
    pub fn new(fields: BlogFields) -> Self {
        Self::with_id(BlogId::generate(), fields)
    }

    /// Attach `fields` to an existing id.
    pub fn with_id(id: BlogId, fields: BlogFields) -> Self {
        Self {
            id,
            author_id: fields.author_id,
            title: fields.title,
            content: fields.content,
        }
    }

    pub fn fields(&self) -> BlogFields {
        BlogFields {
            author_id: self.author_id.clone(),
            title: self.title.clone(),
            content: self.content.clone(),
        }
    }
}
