use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ItemRequestId, UserId, item::Item};

/// アイテムリクエスト - まだ出品されていないアイテムの募集
///
/// 作成後は不変。応えたアイテムの一覧は読み取り時に計算する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRequest {
    pub id: ItemRequestId,
    pub description: String,
    pub requester_id: UserId,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItemRequest {
    pub description: String,
    pub requester_id: UserId,
    pub created: DateTime<Utc>,
}

/// リクエストと、それに応えて出品されたアイテム
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRequestWithItems {
    pub request: ItemRequest,
    pub items: Vec<Item>,
}
