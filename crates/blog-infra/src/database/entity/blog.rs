//! Blog entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use blog_core::{BlogFields, BlogId, BlogPost, StoreError};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blogs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_id: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to domain BlogPost.
///
/// Fails if a row holds an id that is not a UUIDv4.
impl TryFrom<Model> for BlogPost {
    type Error = StoreError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = BlogId::try_from(model.id).map_err(|e| StoreError::Malformed(e.to_string()))?;
        Ok(BlogPost::with_id(
            id,
            BlogFields {
                author_id: model.author_id,
                title: model.title,
                content: model.content,
            },
        ))
    }
}

/// Conversion from domain BlogPost to SeaORM ActiveModel.
impl From<&BlogPost> for ActiveModel {
    fn from(post: &BlogPost) -> Self {
        Self {
            id: Set(*post.id.as_uuid()),
            author_id: Set(post.author_id.clone()),
            title: Set(post.title.clone()),
            content: Set(post.content.clone()),
        }
    }
}
