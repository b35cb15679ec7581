use crate::domain::{
    UserId,
    user::{NewUser, User},
};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// ユーザーディレクトリのポート
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// ユーザーを保存し、採番されたIDを含めて返す
    async fn insert(&self, user: NewUser) -> Result<User>;

    /// 既存ユーザーを上書きする
    async fn update(&self, user: &User) -> Result<()>;

    async fn find_by_id(&self, user_id: UserId) -> Result<Option<User>>;

    /// 全ユーザーをID昇順で返す
    async fn find_all(&self) -> Result<Vec<User>>;

    /// メールアドレスの重複確認に使用される
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// 削除したらtrue、存在しなければfalse
    async fn delete(&self, user_id: UserId) -> Result<bool>;
}
