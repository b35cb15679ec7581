use super::booking::BookingStatus;

/// ページ指定のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationError {
    /// sizeが0以下（ページ番号の計算が成立しない）
    NonPositiveSize(i64),
    /// fromが負
    NegativeOffset(i64),
}

/// 予約期間のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingPeriodError {
    /// 終了日時が開始日時と同じか前
    EndNotAfterStart,
}

/// 予約申込のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateBookingError {
    /// 所有者自身による予約
    OwnItem,
    /// アイテムが貸出不可
    ItemUnavailable,
    /// 予約期間が不正
    InvalidPeriod(BookingPeriodError),
}

impl From<BookingPeriodError> for CreateBookingError {
    fn from(err: BookingPeriodError) -> Self {
        CreateBookingError::InvalidPeriod(err)
    }
}

/// ステータス遷移のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusTransitionError {
    /// 既に同じステータスになっている
    AlreadySet(BookingStatus),
    /// 遷移表で許可されていない
    NotAllowed {
        from: BookingStatus,
        to: BookingStatus,
    },
}

/// 予約状態フィルタの解析エラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBookingState(pub String);

/// コメント投稿可否のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentEligibilityError {
    /// 終了済みの予約が1件もない
    NoFinishedBooking,
    /// 終了していない予約が含まれている
    BookingNotFinished,
}
