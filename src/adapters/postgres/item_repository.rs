use crate::domain::{
    ItemId, ItemRequestId, PageRequest, UserId,
    item::{Item, NewItem},
};
use crate::ports::item_repository::{ItemRepository as ItemRepositoryTrait, Result};
use async_trait::async_trait;
use sqlx::PgPool;

use super::rows::map_row_to_item;

/// ItemRepositoryのPostgreSQL実装
pub struct ItemRepository {
    pool: PgPool,
}

impl ItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// LIKEのワイルドカード文字をエスケープする
fn escape_like(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl ItemRepositoryTrait for ItemRepository {
    async fn insert(&self, item: NewItem) -> Result<Item> {
        let row = sqlx::query(
            r#"
            INSERT INTO items (name, description, is_available, owner_id, request_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, is_available, owner_id, request_id
            "#,
        )
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.available)
        .bind(item.owner_id.value())
        .bind(item.request_id.map(|id| id.value()))
        .fetch_one(&self.pool)
        .await?;

        Ok(map_row_to_item(&row))
    }

    async fn update(&self, item: &Item) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE items
            SET name = $2, description = $3, is_available = $4
            WHERE id = $1
            "#,
        )
        .bind(item.id.value())
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.available)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, item_id: ItemId) -> Result<Option<Item>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, is_available, owner_id, request_id
            FROM items
            WHERE id = $1
            "#,
        )
        .bind(item_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_item))
    }

    async fn find_by_owner(&self, owner_id: UserId, page: PageRequest) -> Result<Vec<Item>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, is_available, owner_id, request_id
            FROM items
            WHERE owner_id = $1
            ORDER BY id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner_id.value())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_item).collect())
    }

    /// 貸出可能なアイテムを名前・説明の部分一致（大文字小文字を区別しない）で検索
    async fn search(&self, text: &str, page: PageRequest) -> Result<Vec<Item>> {
        let pattern = format!("%{}%", escape_like(text));

        let rows = sqlx::query(
            r#"
            SELECT id, name, description, is_available, owner_id, request_id
            FROM items
            WHERE is_available
              AND (name ILIKE $1 OR description ILIKE $1)
            ORDER BY id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(pattern)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_item).collect())
    }

    async fn find_by_request_id(&self, request_id: ItemRequestId) -> Result<Vec<Item>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, is_available, owner_id, request_id
            FROM items
            WHERE request_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(request_id.value())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_item).collect())
    }

    async fn has_items(&self, owner_id: UserId) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM items WHERE owner_id = $1)")
                .bind(owner_id.value())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_escapes_wildcards() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("drill"), "drill");
    }
}
