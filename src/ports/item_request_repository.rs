use crate::domain::{
    ItemRequestId, PageRequest, UserId,
    item_request::{ItemRequest, NewItemRequest},
};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// アイテムリクエスト掲示板のポート
#[async_trait]
pub trait ItemRequestRepository: Send + Sync {
    async fn insert(&self, request: NewItemRequest) -> Result<ItemRequest>;

    async fn find_by_id(&self, request_id: ItemRequestId) -> Result<Option<ItemRequest>>;

    /// 自分のリクエストを作成日時の降順で返す
    async fn find_by_requester(&self, requester_id: UserId) -> Result<Vec<ItemRequest>>;

    /// 他のユーザーのリクエストを作成日時の降順でページ取得する
    async fn find_from_others(&self, user_id: UserId, page: PageRequest)
    -> Result<Vec<ItemRequest>>;
}
