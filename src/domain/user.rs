use serde::{Deserialize, Serialize};

use super::UserId;

/// ユーザー
///
/// アイテム・予約・リクエスト・コメントから参照される（所有はされない）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// 新規登録するユーザー（IDはストアが採番）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

/// ユーザーの部分更新
///
/// None または空白のみのフィールドは無視される。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UserPatch {
    /// 更新後のメールアドレス（変更がない場合はNone）
    pub fn effective_email(&self) -> Option<&str> {
        non_blank(self.email.as_deref())
    }

    /// 純粋関数：パッチを適用した新しいUserを返す
    pub fn apply(&self, user: &User) -> User {
        User {
            id: user.id,
            name: non_blank(self.name.as_deref())
                .map(str::to_string)
                .unwrap_or_else(|| user.name.clone()),
            email: self
                .effective_email()
                .map(str::to_string)
                .unwrap_or_else(|| user.email.clone()),
        }
    }
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: UserId::new(1),
            name: "test".to_string(),
            email: "test@mail.ru".to_string(),
        }
    }

    #[test]
    fn test_patch_updates_given_fields() {
        let patch = UserPatch {
            name: Some("updated".to_string()),
            email: None,
        };
        let updated = patch.apply(&user());
        assert_eq!(updated.name, "updated");
        assert_eq!(updated.email, "test@mail.ru");
    }

    #[test]
    fn test_patch_ignores_blank_fields() {
        let patch = UserPatch {
            name: Some("   ".to_string()),
            email: Some(String::new()),
        };
        assert_eq!(patch.apply(&user()), user());
        assert!(patch.effective_email().is_none());
    }
}
