use crate::domain::{
    ItemId,
    comment::{Comment, NewComment},
};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// コメント台帳のポート
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// コメントを保存し、投稿者名を結合して返す
    async fn insert(&self, comment: NewComment) -> Result<Comment>;

    /// アイテムのコメントをID昇順で返す
    async fn find_by_item(&self, item_id: ItemId) -> Result<Vec<Comment>>;
}
