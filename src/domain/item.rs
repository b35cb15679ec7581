use serde::{Deserialize, Serialize};

use super::{
    ItemId, ItemRequestId, UserId, booking::Booking, comment::Comment, user::non_blank,
};

/// アイテム
///
/// 所有者が出品し、所有者だけが変更できる。
/// request_id はこのアイテムが応えたアイテムリクエスト（任意）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: UserId,
    pub request_id: Option<ItemRequestId>,
}

impl Item {
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }
}

/// アイテムの読み取り形（コメントと直近・次回の予約を付加）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDetails {
    pub item: Item,
    pub last_booking: Option<Booking>,
    pub next_booking: Option<Booking>,
    pub comments: Vec<Comment>,
}

/// 新規出品するアイテム
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: UserId,
    pub request_id: Option<ItemRequestId>,
}

/// アイテムの部分更新
///
/// ビジネスルール：
/// - available は指定されていれば反映
/// - name / description は空白でなければ反映
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}

impl ItemPatch {
    /// 純粋関数：パッチを適用した新しいItemを返す
    pub fn apply(&self, item: &Item) -> Item {
        Item {
            name: non_blank(self.name.as_deref())
                .map(str::to_string)
                .unwrap_or_else(|| item.name.clone()),
            description: non_blank(self.description.as_deref())
                .map(str::to_string)
                .unwrap_or_else(|| item.description.clone()),
            available: self.available.unwrap_or(item.available),
            ..item.clone()
        }
    }
}
