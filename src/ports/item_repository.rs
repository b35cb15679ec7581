use crate::domain::{
    ItemId, ItemRequestId, PageRequest, UserId,
    item::{Item, NewItem},
};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// アイテムカタログのポート
#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn insert(&self, item: NewItem) -> Result<Item>;

    async fn update(&self, item: &Item) -> Result<()>;

    async fn find_by_id(&self, item_id: ItemId) -> Result<Option<Item>>;

    /// 所有者のアイテムをID昇順でページ取得する
    async fn find_by_owner(&self, owner_id: UserId, page: PageRequest) -> Result<Vec<Item>>;

    /// 貸出可能なアイテムから、名前または説明に text を含むもの（大文字小文字を区別しない）
    ///
    /// ID昇順でページ取得する。
    async fn search(&self, text: &str, page: PageRequest) -> Result<Vec<Item>>;

    /// リクエストに応えて出品されたアイテム（ID昇順）
    async fn find_by_request_id(&self, request_id: ItemRequestId) -> Result<Vec<Item>>;

    /// 所有者が1件以上アイテムを持っているか
    async fn has_items(&self, owner_id: UserId) -> Result<bool>;
}
