use thiserror::Error;

use crate::domain::{
    BookingId, ItemId, ItemRequestId, UserId,
    booking::BookingStatus,
    errors::{
        BookingPeriodError, CommentEligibilityError, CreateBookingError, PaginationError,
        StatusTransitionError, UnknownBookingState,
    },
};

/// エラーの分類
///
/// API層はこの分類だけでHTTPステータスを決める。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    BadRequest,
    UnsupportedState,
    CommentBadRequest,
    Conflict,
    Internal,
}

/// ShareItアプリケーション層のエラー
///
/// 権限のない操作は存在を漏らさないよう NotFound に分類される。
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// ユーザーが存在しない
    #[error("User with id {0} not found")]
    UserNotFound(UserId),

    /// アイテムが存在しない
    #[error("Item with id {0} not found")]
    ItemNotFound(ItemId),

    /// 予約が存在しない
    #[error("Booking with id {0} not found")]
    BookingNotFound(BookingId),

    /// アイテムリクエストが存在しない
    #[error("Item request with id {0} not found")]
    ItemRequestNotFound(ItemRequestId),

    /// 所有者が自分のアイテムを予約しようとした
    #[error("Item cannot be booked by its owner")]
    OwnItemBooking,

    /// アイテム所有者以外が所有者向けの操作をした
    #[error("Only the owner of item {0} can perform this action")]
    NotItemOwner(ItemId),

    /// 予約者でも所有者でもないユーザーが予約を閲覧しようとした
    #[error("Booking can be viewed only by its booker or by the owner of the item")]
    BookingAccessDenied,

    /// アイテムが貸出不可
    #[error("Item {0} is not available for booking")]
    ItemNotAvailable(ItemId),

    /// 予約期間が不正
    #[error("Booking end must be after its start")]
    InvalidBookingPeriod,

    /// 同じステータスが既に設定されている
    #[error("Booking status is already {0}")]
    StatusAlreadySet(BookingStatus),

    /// 遷移表で許可されていない
    #[error("Booking status cannot change from {from} to {to}")]
    InvalidStatusTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    /// アイテムを1件も持たないユーザーが所有者向け一覧を要求した
    #[error("This request makes sense only for an owner of at least one item")]
    OwnsNoItems,

    /// ページ指定が不正
    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),

    /// 未知の状態フィルタ
    #[error("Unknown state: UNSUPPORTED_STATUS")]
    UnsupportedState(String),

    /// 借りたことのないアイテムへのコメント
    #[error("Only users who have rented the item can leave a comment")]
    NoFinishedBooking,

    /// 貸出期間が終わっていない
    #[error("A comment can be left only after the rental period has ended")]
    BookingNotFinished,

    /// メールアドレスの重複
    #[error("Email {0} is already in use")]
    EmailAlreadyExists(String),

    /// リポジトリのエラー
    #[error("Repository error")]
    RepositoryError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApplicationError {
    pub fn kind(&self) -> ErrorKind {
        use ApplicationError::*;

        match self {
            UserNotFound(_)
            | ItemNotFound(_)
            | BookingNotFound(_)
            | ItemRequestNotFound(_)
            | OwnItemBooking
            | NotItemOwner(_)
            | BookingAccessDenied => ErrorKind::NotFound,
            ItemNotAvailable(_)
            | InvalidBookingPeriod
            | StatusAlreadySet(_)
            | InvalidStatusTransition { .. }
            | OwnsNoItems
            | InvalidPagination(_) => ErrorKind::BadRequest,
            UnsupportedState(_) => ErrorKind::UnsupportedState,
            NoFinishedBooking | BookingNotFinished => ErrorKind::CommentBadRequest,
            EmailAlreadyExists(_) => ErrorKind::Conflict,
            RepositoryError(_) => ErrorKind::Internal,
        }
    }
}

impl From<PaginationError> for ApplicationError {
    fn from(err: PaginationError) -> Self {
        let detail = match err {
            PaginationError::NonPositiveSize(size) => {
                format!("size must be positive, got {}", size)
            }
            PaginationError::NegativeOffset(from) => {
                format!("from must not be negative, got {}", from)
            }
        };
        ApplicationError::InvalidPagination(detail)
    }
}

impl From<UnknownBookingState> for ApplicationError {
    fn from(err: UnknownBookingState) -> Self {
        ApplicationError::UnsupportedState(err.0)
    }
}

impl From<BookingPeriodError> for ApplicationError {
    fn from(err: BookingPeriodError) -> Self {
        match err {
            BookingPeriodError::EndNotAfterStart => ApplicationError::InvalidBookingPeriod,
        }
    }
}

impl From<StatusTransitionError> for ApplicationError {
    fn from(err: StatusTransitionError) -> Self {
        match err {
            StatusTransitionError::AlreadySet(status) => ApplicationError::StatusAlreadySet(status),
            StatusTransitionError::NotAllowed { from, to } => {
                ApplicationError::InvalidStatusTransition { from, to }
            }
        }
    }
}

impl From<CommentEligibilityError> for ApplicationError {
    fn from(err: CommentEligibilityError) -> Self {
        match err {
            CommentEligibilityError::NoFinishedBooking => ApplicationError::NoFinishedBooking,
            CommentEligibilityError::BookingNotFinished => ApplicationError::BookingNotFinished,
        }
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, ApplicationError>;

pub(crate) fn from_create_booking_error(
    err: CreateBookingError,
    item_id: ItemId,
) -> ApplicationError {
    match err {
        CreateBookingError::OwnItem => ApplicationError::OwnItemBooking,
        CreateBookingError::ItemUnavailable => ApplicationError::ItemNotAvailable(item_id),
        CreateBookingError::InvalidPeriod(period) => period.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_failures_are_not_found() {
        assert_eq!(ApplicationError::OwnItemBooking.kind(), ErrorKind::NotFound);
        assert_eq!(
            ApplicationError::NotItemOwner(ItemId::new(1)).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(ApplicationError::BookingAccessDenied.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_unsupported_state_message() {
        let err = ApplicationError::from(UnknownBookingState("UNSUPPORTED".to_string()));
        assert_eq!(err.kind(), ErrorKind::UnsupportedState);
        assert_eq!(err.to_string(), "Unknown state: UNSUPPORTED_STATUS");
    }

    #[test]
    fn test_pagination_error_is_bad_request() {
        let err = ApplicationError::from(PaginationError::NonPositiveSize(0));
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn test_comment_errors_have_their_own_kind() {
        let err = ApplicationError::from(CommentEligibilityError::NoFinishedBooking);
        assert_eq!(err.kind(), ErrorKind::CommentBadRequest);
    }
}
