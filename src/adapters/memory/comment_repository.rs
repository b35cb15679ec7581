use crate::domain::{
    ItemId,
    comment::{Comment, NewComment},
};
use crate::ports::comment_repository::{CommentRepository as CommentRepositoryTrait, Result};
use async_trait::async_trait;

use super::database::{CommentRow, InMemoryDatabase};

/// In-memory implementation of CommentRepository
pub struct CommentRepository {
    db: InMemoryDatabase,
}

impl CommentRepository {
    pub fn new(db: InMemoryDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommentRepositoryTrait for CommentRepository {
    async fn insert(&self, comment: NewComment) -> Result<Comment> {
        let mut tables = self.db.lock()?;
        let row = CommentRow {
            id: tables.next_comment_id(),
            text: comment.text,
            item_id: comment.item_id,
            author_id: comment.author_id,
            created: comment.created,
        };
        tables.comments.insert(row.id, row.clone());

        tables
            .join_comment(&row)
            .ok_or_else(|| {
                format!("author {} of comment {} not found", row.author_id, row.id).into()
            })
    }

    async fn find_by_item(&self, item_id: ItemId) -> Result<Vec<Comment>> {
        let tables = self.db.lock()?;
        Ok(tables
            .comments
            .values()
            .filter(|c| c.item_id == item_id)
            .filter_map(|c| tables.join_comment(c))
            .collect())
    }
}
