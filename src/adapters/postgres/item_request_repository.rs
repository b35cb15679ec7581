use crate::domain::{
    ItemRequestId, PageRequest, UserId,
    item_request::{ItemRequest, NewItemRequest},
};
use crate::ports::item_request_repository::{
    ItemRequestRepository as ItemRequestRepositoryTrait, Result,
};
use async_trait::async_trait;
use sqlx::PgPool;

use super::rows::map_row_to_item_request;

/// ItemRequestRepositoryのPostgreSQL実装
pub struct ItemRequestRepository {
    pool: PgPool,
}

impl ItemRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemRequestRepositoryTrait for ItemRequestRepository {
    async fn insert(&self, request: NewItemRequest) -> Result<ItemRequest> {
        let row = sqlx::query(
            r#"
            INSERT INTO requests (description, requester_id, created)
            VALUES ($1, $2, $3)
            RETURNING id, description, requester_id, created
            "#,
        )
        .bind(&request.description)
        .bind(request.requester_id.value())
        .bind(request.created)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_row_to_item_request(&row))
    }

    async fn find_by_id(&self, request_id: ItemRequestId) -> Result<Option<ItemRequest>> {
        let row = sqlx::query(
            "SELECT id, description, requester_id, created FROM requests WHERE id = $1",
        )
        .bind(request_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row_to_item_request))
    }

    async fn find_by_requester(&self, requester_id: UserId) -> Result<Vec<ItemRequest>> {
        let rows = sqlx::query(
            r#"
            SELECT id, description, requester_id, created
            FROM requests
            WHERE requester_id = $1
            ORDER BY created DESC, id DESC
            "#,
        )
        .bind(requester_id.value())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_item_request).collect())
    }

    async fn find_from_others(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Vec<ItemRequest>> {
        let rows = sqlx::query(
            r#"
            SELECT id, description, requester_id, created
            FROM requests
            WHERE requester_id <> $1
            ORDER BY created DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id.value())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row_to_item_request).collect())
    }
}
