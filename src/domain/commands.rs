use chrono::{DateTime, Utc};

use super::{BookingId, ItemId, ItemRequestId, UserId, item::ItemPatch, user::UserPatch};

/// コマンド：ユーザーを登録する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
}

/// コマンド：ユーザーを部分更新する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUser {
    pub user_id: UserId,
    pub patch: UserPatch,
}

/// コマンド：アイテムを出品する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateItem {
    pub owner_id: UserId,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub request_id: Option<ItemRequestId>,
}

/// コマンド：アイテムを部分更新する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateItem {
    pub owner_id: UserId,
    pub item_id: ItemId,
    pub patch: ItemPatch,
}

/// コマンド：コメントを投稿する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddComment {
    pub author_id: UserId,
    pub item_id: ItemId,
    pub text: String,
}

/// コマンド：アイテムリクエストを登録する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateItemRequest {
    pub requester_id: UserId,
    pub description: String,
}

/// コマンド：予約を申し込む
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBooking {
    pub booker_id: UserId,
    pub item_id: ItemId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// コマンド：予約を承認・却下する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApproveBooking {
    pub owner_id: UserId,
    pub booking_id: BookingId,
    pub approved: bool,
}
