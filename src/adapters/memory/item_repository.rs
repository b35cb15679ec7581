use crate::domain::{
    ItemId, ItemRequestId, PageRequest, UserId,
    item::{Item, NewItem},
};
use crate::ports::item_repository::{ItemRepository as ItemRepositoryTrait, Result};
use async_trait::async_trait;

use super::database::InMemoryDatabase;

/// In-memory implementation of ItemRepository
pub struct ItemRepository {
    db: InMemoryDatabase,
}

impl ItemRepository {
    pub fn new(db: InMemoryDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ItemRepositoryTrait for ItemRepository {
    async fn insert(&self, item: NewItem) -> Result<Item> {
        let mut tables = self.db.lock()?;
        let item = Item {
            id: tables.next_item_id(),
            name: item.name,
            description: item.description,
            available: item.available,
            owner_id: item.owner_id,
            request_id: item.request_id,
        };
        tables.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update(&self, item: &Item) -> Result<()> {
        let mut tables = self.db.lock()?;
        if let Some(existing) = tables.items.get_mut(&item.id) {
            *existing = item.clone();
        }
        Ok(())
    }

    async fn find_by_id(&self, item_id: ItemId) -> Result<Option<Item>> {
        Ok(self.db.lock()?.items.get(&item_id).cloned())
    }

    async fn find_by_owner(&self, owner_id: UserId, page: PageRequest) -> Result<Vec<Item>> {
        let tables = self.db.lock()?;
        let items: Vec<Item> = tables
            .items
            .values()
            .filter(|item| item.owner_id == owner_id)
            .cloned()
            .collect();
        Ok(page.apply(items))
    }

    async fn search(&self, text: &str, page: PageRequest) -> Result<Vec<Item>> {
        let needle = text.to_lowercase();
        let tables = self.db.lock()?;
        let items: Vec<Item> = tables
            .items
            .values()
            .filter(|item| {
                item.available
                    && (item.name.to_lowercase().contains(&needle)
                        || item.description.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        Ok(page.apply(items))
    }

    async fn find_by_request_id(&self, request_id: ItemRequestId) -> Result<Vec<Item>> {
        Ok(self
            .db
            .lock()?
            .items
            .values()
            .filter(|item| item.request_id == Some(request_id))
            .cloned()
            .collect())
    }

    async fn has_items(&self, owner_id: UserId) -> Result<bool> {
        Ok(self
            .db
            .lock()?
            .items
            .values()
            .any(|item| item.owner_id == owner_id))
    }
}
