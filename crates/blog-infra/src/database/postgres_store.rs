//! PostgreSQL blog store implementation.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use uuid::Uuid;

use blog_core::ports::{BlogStore, DeleteOutcome, PageCursor, ScanPage, UpdateOutcome};
use blog_core::{BlogFields, BlogId, BlogPost, StoreError};

use super::entity::blog::{ActiveModel, Column, Entity as BlogEntity, Model};

/// PostgreSQL blog store.
///
/// Scans use keyset pagination on the primary key; the cursor is the last id
/// of the previous page.
pub struct PostgresBlogStore {
    db: DbConn,
    page_size: u64,
}

impl PostgresBlogStore {
    pub fn new(db: DbConn, page_size: u64) -> Self {
        Self {
            db,
            page_size: page_size.max(1),
        }
    }
}

fn db_error(e: DbErr) -> StoreError {
    match e {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => StoreError::Connection(e.to_string()),
        other => StoreError::Query(other.to_string()),
    }
}

fn to_post(model: Model) -> Result<BlogPost, StoreError> {
    BlogPost::try_from(model)
}

#[async_trait]
impl BlogStore for PostgresBlogStore {
    async fn get(&self, id: &BlogId) -> Result<Option<BlogPost>, StoreError> {
        BlogEntity::find_by_id(*id.as_uuid())
            .one(&self.db)
            .await
            .map_err(db_error)?
            .map(to_post)
            .transpose()
    }

    async fn put(&self, post: &BlogPost) -> Result<(), StoreError> {
        let upsert = OnConflict::column(Column::Id)
            .update_columns([Column::AuthorId, Column::Title, Column::Content])
            .to_owned();

        BlogEntity::insert(ActiveModel::from(post))
            .on_conflict(upsert)
            .exec_without_returning(&self.db)
            .await
            .map_err(db_error)?;

        Ok(())
    }

    async fn conditional_update(
        &self,
        id: &BlogId,
        fields: &BlogFields,
    ) -> Result<UpdateOutcome, StoreError> {
        let result = BlogEntity::update_many()
            .col_expr(Column::AuthorId, Expr::value(fields.author_id.clone()))
            .col_expr(Column::Title, Expr::value(fields.title.clone()))
            .col_expr(Column::Content, Expr::value(fields.content.clone()))
            .filter(Column::Id.eq(*id.as_uuid()))
            .exec(&self.db)
            .await
            .map_err(db_error)?;

        Ok(if result.rows_affected == 0 {
            UpdateOutcome::NotExists
        } else {
            UpdateOutcome::Updated
        })
    }

    async fn delete(&self, id: &BlogId) -> Result<DeleteOutcome, StoreError> {
        let uuid = *id.as_uuid();
        let txn = self.db.begin().await.map_err(db_error)?;

        let existing = BlogEntity::find_by_id(uuid)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_error)?;

        let Some(model) = existing else {
            txn.commit().await.map_err(db_error)?;
            return Ok(DeleteOutcome::NotExists);
        };

        let result = BlogEntity::delete_by_id(uuid)
            .exec(&txn)
            .await
            .map_err(db_error)?;
        txn.commit().await.map_err(db_error)?;

        if result.rows_affected == 0 {
            return Ok(DeleteOutcome::NotExists);
        }
        Ok(DeleteOutcome::Deleted(to_post(model)?))
    }

    async fn scan_page(&self, cursor: Option<&PageCursor>) -> Result<ScanPage, StoreError> {
        let mut query = BlogEntity::find().order_by_asc(Column::Id);

        if let Some(cursor) = cursor {
            let after = Uuid::parse_str(cursor.as_str())
                .map_err(|e| StoreError::Malformed(format!("scan cursor: {e}")))?;
            query = query.filter(Column::Id.gt(after));
        }

        // One extra row tells us whether another page follows.
        let mut rows = query
            .limit(self.page_size + 1)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        let has_more = rows.len() as u64 > self.page_size;
        rows.truncate(self.page_size as usize);

        let next = match rows.last() {
            Some(last) if has_more => Some(PageCursor::new(last.id.to_string())),
            _ => None,
        };
        let items = rows
            .into_iter()
            .map(to_post)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(items = items.len(), has_more, "Scanned blogs page");
        Ok(ScanPage { items, next })
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
