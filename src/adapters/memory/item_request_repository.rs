use crate::domain::{
    ItemRequestId, PageRequest, UserId,
    item_request::{ItemRequest, NewItemRequest},
};
use crate::ports::item_request_repository::{
    ItemRequestRepository as ItemRequestRepositoryTrait, Result,
};
use async_trait::async_trait;

use super::database::InMemoryDatabase;

/// In-memory implementation of ItemRequestRepository
pub struct ItemRequestRepository {
    db: InMemoryDatabase,
}

impl ItemRequestRepository {
    pub fn new(db: InMemoryDatabase) -> Self {
        Self { db }
    }

    fn newest_first(mut requests: Vec<ItemRequest>) -> Vec<ItemRequest> {
        requests.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)));
        requests
    }
}

#[async_trait]
impl ItemRequestRepositoryTrait for ItemRequestRepository {
    async fn insert(&self, request: NewItemRequest) -> Result<ItemRequest> {
        let mut tables = self.db.lock()?;
        let request = ItemRequest {
            id: tables.next_request_id(),
            description: request.description,
            requester_id: request.requester_id,
            created: request.created,
        };
        tables.requests.insert(request.id, request.clone());
        Ok(request)
    }

    async fn find_by_id(&self, request_id: ItemRequestId) -> Result<Option<ItemRequest>> {
        Ok(self.db.lock()?.requests.get(&request_id).cloned())
    }

    async fn find_by_requester(&self, requester_id: UserId) -> Result<Vec<ItemRequest>> {
        let tables = self.db.lock()?;
        let requests: Vec<ItemRequest> = tables
            .requests
            .values()
            .filter(|r| r.requester_id == requester_id)
            .cloned()
            .collect();
        Ok(Self::newest_first(requests))
    }

    async fn find_from_others(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Vec<ItemRequest>> {
        let tables = self.db.lock()?;
        let requests: Vec<ItemRequest> = tables
            .requests
            .values()
            .filter(|r| r.requester_id != user_id)
            .cloned()
            .collect();
        Ok(page.apply(Self::newest_first(requests)))
    }
}
