use crate::domain::{ItemId, UserId, item::Item, user::User};
use crate::ports::*;
use std::sync::Arc;

use super::errors::{ApplicationError, Result};

/// サービスの依存関係
///
/// データ構造として定義し、振る舞いは持たない。
/// 各サービス関数はこれを引数に取る。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub user_repository: Arc<dyn UserRepository>,
    pub item_repository: Arc<dyn ItemRepository>,
    pub booking_repository: Arc<dyn BookingRepository>,
    pub item_request_repository: Arc<dyn ItemRequestRepository>,
    pub comment_repository: Arc<dyn CommentRepository>,
}

/// 既存ユーザーを取得する（存在しなければ UserNotFound）
pub async fn get_existing_user(deps: &ServiceDependencies, user_id: UserId) -> Result<User> {
    deps.user_repository
        .find_by_id(user_id)
        .await
        .map_err(ApplicationError::RepositoryError)?
        .ok_or(ApplicationError::UserNotFound(user_id))
}

/// 既存アイテムを取得する（存在しなければ ItemNotFound）
pub async fn get_existing_item(deps: &ServiceDependencies, item_id: ItemId) -> Result<Item> {
    deps.item_repository
        .find_by_id(item_id)
        .await
        .map_err(ApplicationError::RepositoryError)?
        .ok_or(ApplicationError::ItemNotFound(item_id))
}
