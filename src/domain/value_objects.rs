use serde::{Deserialize, Serialize};

use super::errors::PaginationError;

/// DB採番の64bit整数IDを包む値オブジェクトを定義する
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// ユーザーID - ユーザーディレクトリの識別子
    UserId
);
entity_id!(
    /// アイテムID - アイテムカタログの識別子
    ItemId
);
entity_id!(
    /// 予約ID - 予約ライフサイクルの集約ID
    BookingId
);
entity_id!(
    /// アイテムリクエストID
    ItemRequestId
);
entity_id!(
    /// コメントID
    CommentId
);

/// ページ指定
///
/// 呼び出し側は「何件目から(from)」「何件(size)」で指定する。
/// ページ番号は `from / size`（整数除算）で決まり、取得範囲は
/// `page * size` 件目から `size` 件となる。
/// 不変条件：size > 0, from >= 0（コンストラクタで保証）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    size: i64,
}

impl PageRequest {
    pub fn new(from: i64, size: i64) -> Result<Self, PaginationError> {
        if size <= 0 {
            return Err(PaginationError::NonPositiveSize(size));
        }
        if from < 0 {
            return Err(PaginationError::NegativeOffset(from));
        }
        Ok(Self {
            page: from / size,
            size,
        })
    }

    /// ページ番号（0始まり）
    pub fn page(&self) -> i64 {
        self.page
    }

    /// 1ページの件数（SQLのLIMIT）
    pub fn limit(&self) -> i64 {
        self.size
    }

    /// 読み飛ばす件数（SQLのOFFSET）
    pub fn offset(&self) -> i64 {
        self.page * self.size
    }

    /// インメモリのスライスにページを適用する
    pub fn apply<T>(&self, rows: Vec<T>) -> Vec<T> {
        rows.into_iter()
            .skip(self.offset() as usize)
            .take(self.limit() as usize)
            .collect()
    }
}

/// 並び順（開始日時などのソートキーに対する方向）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_page_is_integer_division() {
        let page = PageRequest::new(25, 10).unwrap();
        assert_eq!(page.page(), 2);
        assert_eq!(page.limit(), 10);
        assert_eq!(page.offset(), 20);
    }

    #[test]
    fn test_page_request_offset_within_first_page_starts_at_zero() {
        // from=5, size=10 は 0ページ目（整数除算）
        let page = PageRequest::new(5, 10).unwrap();
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_page_request_zero_size_fails() {
        let result = PageRequest::new(0, 0);
        assert_eq!(result.unwrap_err(), PaginationError::NonPositiveSize(0));
    }

    #[test]
    fn test_page_request_negative_from_fails() {
        let result = PageRequest::new(-1, 10);
        assert_eq!(result.unwrap_err(), PaginationError::NegativeOffset(-1));
    }

    #[test]
    fn test_page_request_apply() {
        let page = PageRequest::new(2, 2).unwrap();
        let rows = page.apply(vec![1, 2, 3, 4, 5]);
        assert_eq!(rows, vec![3, 4]);
    }

    #[test]
    fn test_entity_id_value() {
        let id = UserId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(id.to_string(), "42");
        assert_ne!(ItemId::new(1), ItemId::new(2));
    }
}
