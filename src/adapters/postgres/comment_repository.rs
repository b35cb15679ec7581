use crate::domain::{
    ItemId,
    comment::{Comment, NewComment},
};
use crate::ports::comment_repository::{CommentRepository as CommentRepositoryTrait, Result};
use async_trait::async_trait;
use sqlx::PgPool;

use super::rows::map_row_to_comment;

/// CommentRepositoryのPostgreSQL実装
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepositoryTrait for CommentRepository {
    /// 投稿者名はINSERTと同じ文で結合して返す
    async fn insert(&self, comment: NewComment) -> Result<Comment> {
        let row = sqlx::query(
            r#"
            WITH inserted AS (
                INSERT INTO comments (text, item_id, author_id, created)
                VALUES ($1, $2, $3, $4)
                RETURNING id, text, item_id, author_id, created
            )
            SELECT
                inserted.id,
                inserted.text,
                inserted.item_id,
                inserted.author_id,
                inserted.created,
                u.name AS author_name
            FROM inserted
            JOIN users u ON u.id = inserted.author_id
            "#,
        )
        .bind(&comment.text)
        .bind(comment.item_id.value())
        .bind(comment.author_id.value())
        .bind(comment.created)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_row_to_comment(&row))
    }

    async fn find_by_item(&self, item_id: ItemId) -> Result<Vec<Comment>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.text, c.item_id, c.author_id, c.created, u.name AS author_name
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.item_id = $1
            ORDER BY c.id ASC
            "#,
        )
        .bind(item_id.value())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_comment).collect())
    }
}
