use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::{
    BookingId, ItemId, PageRequest, SortDirection, UserId,
    errors::{
        BookingPeriodError, CommentEligibilityError, CreateBookingError, StatusTransitionError,
        UnknownBookingState,
    },
    item::Item,
    user::User,
};

// ============================================================================
// ステータス
// ============================================================================

/// 予約ステータス
///
/// 作成時は常に WAITING。approve によって APPROVED / REJECTED へ移る。
/// CANCELED は値として保持できるが、これを生成する操作はない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Waiting,
    Approved,
    Rejected,
    Canceled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Waiting => "WAITING",
            BookingStatus::Approved => "APPROVED",
            BookingStatus::Rejected => "REJECTED",
            BookingStatus::Canceled => "CANCELED",
        }
    }

    /// 所有者の判断から遷移先のステータスを決める
    pub fn from_decision(approved: bool) -> Self {
        if approved {
            BookingStatus::Approved
        } else {
            BookingStatus::Rejected
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WAITING" => Ok(BookingStatus::Waiting),
            "APPROVED" => Ok(BookingStatus::Approved),
            "REJECTED" => Ok(BookingStatus::Rejected),
            "CANCELED" => Ok(BookingStatus::Canceled),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

/// 純粋関数：ステータス遷移
///
/// 遷移表：
///
/// | 現在 \ 遷移先 | APPROVED | REJECTED |
/// |---|---|---|
/// | WAITING  | 可 | 可 |
/// | APPROVED | 既に設定済み | 可 |
/// | REJECTED | 可 | 既に設定済み |
/// | CANCELED | 不可 | 不可 |
///
/// APPROVED と REJECTED の間の行き来は許可したまま（同じ値の再適用のみ拒否）。
pub fn transition(
    current: BookingStatus,
    target: BookingStatus,
) -> Result<BookingStatus, StatusTransitionError> {
    use BookingStatus::*;

    match (current, target) {
        (from, to) if from == to => Err(StatusTransitionError::AlreadySet(to)),
        (Waiting | Approved | Rejected, Approved | Rejected) => Ok(target),
        (from, to) => Err(StatusTransitionError::NotAllowed { from, to }),
    }
}

// ============================================================================
// 予約
// ============================================================================

/// 予約 - アイテムと予約者を結合した読み取り形
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub item: Item,
    pub booker: User,
    pub status: BookingStatus,
}

impl Booking {
    /// 予約者またはアイテム所有者だけが閲覧できる
    pub fn is_visible_to(&self, user_id: UserId) -> bool {
        self.booker.id == user_id || self.item.owner_id == user_id
    }

    pub fn is_finished(&self, now: DateTime<Utc>) -> bool {
        self.end < now
    }
}

/// 保存する新規予約
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub item_id: ItemId,
    pub booker_id: UserId,
    pub status: BookingStatus,
}

/// 純粋関数：予約期間の検証（終了は開始より厳密に後）
pub fn validate_period(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<(), BookingPeriodError> {
    if end <= start {
        return Err(BookingPeriodError::EndNotAfterStart);
    }
    Ok(())
}

/// 純粋関数：予約を申し込む
///
/// ビジネスルール（この順で検証）：
/// - 所有者は自分のアイテムを予約できない
/// - アイテムが貸出可能であること
/// - 終了日時が開始日時より後であること
///
/// 状態はWAITINGで作られる。
pub fn request_booking(
    item: &Item,
    booker_id: UserId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<NewBooking, CreateBookingError> {
    if item.is_owned_by(booker_id) {
        return Err(CreateBookingError::OwnItem);
    }

    if !item.available {
        return Err(CreateBookingError::ItemUnavailable);
    }

    validate_period(start, end)?;

    Ok(NewBooking {
        start,
        end,
        item_id: item.id,
        booker_id,
        status: BookingStatus::Waiting,
    })
}

// ============================================================================
// 一覧クエリ
// ============================================================================

/// 一覧の状態フィルタ（APIのstateパラメータ）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingState {
    All,
    Current,
    Past,
    Future,
    Waiting,
    Rejected,
}

impl BookingState {
    /// 大文字小文字を区別せずに解析する。未指定・空白はALL。
    pub fn parse(raw: Option<&str>) -> Result<Self, UnknownBookingState> {
        let raw = match raw.map(str::trim) {
            None | Some("") => return Ok(BookingState::All),
            Some(raw) => raw,
        };

        match raw.to_ascii_uppercase().as_str() {
            "ALL" => Ok(BookingState::All),
            "CURRENT" => Ok(BookingState::Current),
            "PAST" => Ok(BookingState::Past),
            "FUTURE" => Ok(BookingState::Future),
            "WAITING" => Ok(BookingState::Waiting),
            "REJECTED" => Ok(BookingState::Rejected),
            _ => Err(UnknownBookingState(raw.to_string())),
        }
    }

    /// 時刻を固定してフィルタへ変換する
    pub fn to_filter(self, now: DateTime<Utc>) -> BookingFilter {
        match self {
            BookingState::All => BookingFilter::All,
            BookingState::Current => BookingFilter::Current { now },
            BookingState::Past => BookingFilter::Past { now },
            BookingState::Future => BookingFilter::Future { now },
            BookingState::Waiting => BookingFilter::Status(BookingStatus::Waiting),
            BookingState::Rejected => BookingFilter::Status(BookingStatus::Rejected),
        }
    }
}

/// 誰の視点で一覧するか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingScope {
    /// 予約者として
    Booker(UserId),
    /// アイテム所有者として
    ItemOwner(UserId),
}

impl BookingScope {
    pub fn includes(&self, booking: &Booking) -> bool {
        match self {
            BookingScope::Booker(user_id) => booking.booker.id == *user_id,
            BookingScope::ItemOwner(user_id) => booking.item.owner_id == *user_id,
        }
    }
}

/// 一覧の絞り込み条件
///
/// CURRENT/PAST/FUTURE は同じ時刻に対して ALL を重複なく分割する：
/// - CURRENT: start <= now <= end
/// - PAST:    end < now
/// - FUTURE:  start > now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingFilter {
    All,
    /// 終了時刻ちょうどはPASTではなくCURRENT（`start <= now <= end`）。
    /// PAST/FUTURE と合わせて、ある時点の予約をもれなく重複なく分ける。
    Current { now: DateTime<Utc> },
    Past { now: DateTime<Utc> },
    Future { now: DateTime<Utc> },
    Status(BookingStatus),
}

impl BookingFilter {
    pub fn matches(&self, booking: &Booking) -> bool {
        match self {
            BookingFilter::All => true,
            BookingFilter::Current { now } => booking.start <= *now && *now <= booking.end,
            BookingFilter::Past { now } => booking.end < *now,
            BookingFilter::Future { now } => booking.start > *now,
            BookingFilter::Status(status) => booking.status == *status,
        }
    }
}

/// 予約一覧クエリの記述子
///
/// 並び順は開始日時（同値はIDで同方向）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingQuery {
    pub scope: BookingScope,
    pub filter: BookingFilter,
    pub direction: SortDirection,
    pub page: PageRequest,
}

impl BookingQuery {
    /// 既定は開始日時の降順。所有者視点のCURRENTだけは昇順。
    pub fn for_state(
        scope: BookingScope,
        state: BookingState,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> Self {
        let direction = match (scope, state) {
            (BookingScope::ItemOwner(_), BookingState::Current) => SortDirection::Ascending,
            _ => SortDirection::Descending,
        };

        Self {
            scope,
            filter: state.to_filter(now),
            direction,
            page,
        }
    }

    pub fn matches(&self, booking: &Booking) -> bool {
        self.scope.includes(booking) && self.filter.matches(booking)
    }

    pub fn compare(&self, a: &Booking, b: &Booking) -> Ordering {
        let ordering = a.start.cmp(&b.start).then(a.id.cmp(&b.id));
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

// ============================================================================
// アイテムの直近・次回予約
// ============================================================================

/// 直近の予約：開始が now 以前で最も遅いもの
pub fn select_last<'a>(
    bookings: impl IntoIterator<Item = &'a Booking>,
    now: DateTime<Utc>,
) -> Option<&'a Booking> {
    bookings
        .into_iter()
        .filter(|b| b.start <= now)
        .max_by(|a, b| a.start.cmp(&b.start).then(a.id.cmp(&b.id)))
}

/// 次回の予約：開始が now より後で最も早いもの
pub fn select_next<'a>(
    bookings: impl IntoIterator<Item = &'a Booking>,
    now: DateTime<Utc>,
) -> Option<&'a Booking> {
    bookings
        .into_iter()
        .filter(|b| b.start > now)
        .min_by(|a, b| a.start.cmp(&b.start).then(a.id.cmp(&b.id)))
}

/// 直近の予約がなければ次回の予約も表示しない
pub fn couple_last_and_next<T>(last: Option<T>, next: Option<T>) -> (Option<T>, Option<T>) {
    match last {
        Some(last) => (Some(last), next),
        None => (None, None),
    }
}

// ============================================================================
// コメント投稿可否
// ============================================================================

/// 純粋関数：コメント投稿の可否を判定する
///
/// `finished` は「終了日時が問い合わせ時刻より前」の条件で取得した
/// 投稿者の予約。1件もなければ不可。判定時刻 `now` で終了していない
/// 予約が含まれていても不可。
pub fn check_comment_eligibility(
    finished: &[Booking],
    now: DateTime<Utc>,
) -> Result<(), CommentEligibilityError> {
    if finished.is_empty() {
        return Err(CommentEligibilityError::NoFinishedBooking);
    }

    if finished.iter().any(|booking| booking.end > now) {
        return Err(CommentEligibilityError::BookingNotFinished);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn owner() -> User {
        User {
            id: UserId::new(1),
            name: "test".to_string(),
            email: "test@mail.ru".to_string(),
        }
    }

    fn not_owner() -> User {
        User {
            id: UserId::new(2),
            name: "fake".to_string(),
            email: "fake@mail.ru".to_string(),
        }
    }

    fn item() -> Item {
        Item {
            id: ItemId::new(1),
            name: "tool".to_string(),
            description: "cool tool".to_string(),
            available: true,
            owner_id: owner().id,
            request_id: None,
        }
    }

    fn at(year: i32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, 11, 11, 11, 11, 0).unwrap()
    }

    fn booking(
        id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        status: BookingStatus,
    ) -> Booking {
        Booking {
            id: BookingId::new(id),
            start,
            end,
            item: item(),
            booker: not_owner(),
            status,
        }
    }

    // --- ステータス遷移 ---

    #[test]
    fn test_transition_waiting_to_approved_and_rejected() {
        assert_eq!(
            transition(BookingStatus::Waiting, BookingStatus::Approved),
            Ok(BookingStatus::Approved)
        );
        assert_eq!(
            transition(BookingStatus::Waiting, BookingStatus::Rejected),
            Ok(BookingStatus::Rejected)
        );
    }

    #[test]
    fn test_transition_same_status_fails() {
        assert_eq!(
            transition(BookingStatus::Approved, BookingStatus::Approved),
            Err(StatusTransitionError::AlreadySet(BookingStatus::Approved))
        );
        assert_eq!(
            transition(BookingStatus::Rejected, BookingStatus::Rejected),
            Err(StatusTransitionError::AlreadySet(BookingStatus::Rejected))
        );
    }

    #[test]
    fn test_transition_between_approved_and_rejected_is_allowed() {
        assert_eq!(
            transition(BookingStatus::Rejected, BookingStatus::Approved),
            Ok(BookingStatus::Approved)
        );
        assert_eq!(
            transition(BookingStatus::Approved, BookingStatus::Rejected),
            Ok(BookingStatus::Rejected)
        );
    }

    #[test]
    fn test_transition_from_canceled_fails() {
        assert_eq!(
            transition(BookingStatus::Canceled, BookingStatus::Approved),
            Err(StatusTransitionError::NotAllowed {
                from: BookingStatus::Canceled,
                to: BookingStatus::Approved,
            })
        );
    }

    #[test]
    fn test_transition_back_to_waiting_fails() {
        assert!(matches!(
            transition(BookingStatus::Approved, BookingStatus::Waiting),
            Err(StatusTransitionError::NotAllowed { .. })
        ));
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            BookingStatus::Waiting,
            BookingStatus::Approved,
            BookingStatus::Rejected,
            BookingStatus::Canceled,
        ] {
            assert_eq!(status.as_str().parse::<BookingStatus>(), Ok(status));
        }
    }

    // --- 予約申込 ---

    #[test]
    fn test_request_booking_creates_waiting_booking() {
        let new_booking = request_booking(&item(), not_owner().id, at(2026), at(2027)).unwrap();
        assert_eq!(new_booking.status, BookingStatus::Waiting);
        assert_eq!(new_booking.booker_id, not_owner().id);
        assert_eq!(new_booking.item_id, item().id);
    }

    #[test]
    fn test_request_booking_by_owner_fails_even_if_unavailable() {
        let mut unavailable = item();
        unavailable.available = false;
        let result = request_booking(&unavailable, owner().id, at(2026), at(2027));
        assert_eq!(result.unwrap_err(), CreateBookingError::OwnItem);
    }

    #[test]
    fn test_request_booking_unavailable_item_fails() {
        let mut unavailable = item();
        unavailable.available = false;
        let result = request_booking(&unavailable, not_owner().id, at(2026), at(2027));
        assert_eq!(result.unwrap_err(), CreateBookingError::ItemUnavailable);
    }

    #[test]
    fn test_request_booking_end_before_start_fails() {
        let result = request_booking(&item(), not_owner().id, at(2027), at(2026));
        assert_eq!(
            result.unwrap_err(),
            CreateBookingError::InvalidPeriod(BookingPeriodError::EndNotAfterStart)
        );

        let result = request_booking(&item(), not_owner().id, at(2026), at(2026));
        assert!(result.is_err());
    }

    // --- 状態フィルタ ---

    #[test]
    fn test_state_parse_is_case_insensitive() {
        assert_eq!(BookingState::parse(Some("current")), Ok(BookingState::Current));
        assert_eq!(BookingState::parse(Some("Past")), Ok(BookingState::Past));
        assert_eq!(BookingState::parse(Some("REJECTED")), Ok(BookingState::Rejected));
    }

    #[test]
    fn test_state_parse_blank_defaults_to_all() {
        assert_eq!(BookingState::parse(None), Ok(BookingState::All));
        assert_eq!(BookingState::parse(Some("")), Ok(BookingState::All));
        assert_eq!(BookingState::parse(Some("  ")), Ok(BookingState::All));
    }

    #[test]
    fn test_state_parse_unknown_fails() {
        assert_eq!(
            BookingState::parse(Some("UNSUPPORTED")),
            Err(UnknownBookingState("UNSUPPORTED".to_string()))
        );
    }

    #[test]
    fn test_current_past_future_partition_all() {
        let now = at(2024);
        let bookings = vec![
            booking(1, at(2021), at(2022), BookingStatus::Rejected),
            booking(2, at(2022), at(2025), BookingStatus::Waiting),
            booking(3, at(2025), at(2026), BookingStatus::Approved),
            // 境界：終了がちょうど now
            booking(4, at(2023), now, BookingStatus::Approved),
            // 境界：開始がちょうど now
            booking(5, now, at(2027), BookingStatus::Waiting),
        ];

        for b in &bookings {
            let hits = [
                BookingFilter::Current { now },
                BookingFilter::Past { now },
                BookingFilter::Future { now },
            ]
            .iter()
            .filter(|f| f.matches(b))
            .count();
            assert_eq!(hits, 1, "booking {} must match exactly one filter", b.id);
        }
    }

    #[test]
    fn test_booking_ending_now_is_current_not_past() {
        let now = at(2024);
        let ending_now = booking(1, at(2023), now, BookingStatus::Approved);

        assert!(BookingFilter::Current { now }.matches(&ending_now));
        assert!(!BookingFilter::Past { now }.matches(&ending_now));
    }

    #[test]
    fn test_status_filter_matches_exact_status() {
        let filter = BookingState::Waiting.to_filter(at(2024));
        assert!(filter.matches(&booking(1, at(2025), at(2026), BookingStatus::Waiting)));
        assert!(!filter.matches(&booking(2, at(2025), at(2026), BookingStatus::Approved)));
    }

    #[test]
    fn test_query_direction_owner_current_is_ascending() {
        let page = PageRequest::new(0, 10).unwrap();
        let now = at(2024);

        let owner_scope = BookingScope::ItemOwner(owner().id);
        let booker_scope = BookingScope::Booker(not_owner().id);

        let owner_current = BookingQuery::for_state(owner_scope, BookingState::Current, now, page);
        assert_eq!(owner_current.direction, SortDirection::Ascending);

        let booker_current =
            BookingQuery::for_state(booker_scope, BookingState::Current, now, page);
        assert_eq!(booker_current.direction, SortDirection::Descending);

        let owner_all = BookingQuery::for_state(owner_scope, BookingState::All, now, page);
        assert_eq!(owner_all.direction, SortDirection::Descending);
    }

    #[test]
    fn test_query_scope() {
        let b = booking(1, at(2025), at(2026), BookingStatus::Waiting);
        assert!(BookingScope::Booker(not_owner().id).includes(&b));
        assert!(!BookingScope::Booker(owner().id).includes(&b));
        assert!(BookingScope::ItemOwner(owner().id).includes(&b));
        assert!(!BookingScope::ItemOwner(not_owner().id).includes(&b));
    }

    // --- 直近・次回 ---

    #[test]
    fn test_select_last_and_next() {
        let now = at(2024);
        let bookings = vec![
            booking(1, at(2021), at(2022), BookingStatus::Approved),
            booking(2, at(2023), at(2025), BookingStatus::Approved),
            booking(3, at(2026), at(2027), BookingStatus::Waiting),
            booking(4, at(2025), at(2026), BookingStatus::Waiting),
        ];

        assert_eq!(select_last(&bookings, now).map(|b| b.id), Some(BookingId::new(2)));
        assert_eq!(select_next(&bookings, now).map(|b| b.id), Some(BookingId::new(4)));
    }

    #[test]
    fn test_next_is_hidden_without_last() {
        let (last, next) = couple_last_and_next(None, Some(1));
        assert_eq!(last, None);
        assert_eq!(next, None);

        let (last, next) = couple_last_and_next(Some(1), Some(2));
        assert_eq!(last, Some(1));
        assert_eq!(next, Some(2));
    }

    // --- コメント投稿可否 ---

    #[test]
    fn test_comment_eligibility_without_bookings_fails() {
        let result = check_comment_eligibility(&[], Utc::now());
        assert_eq!(result, Err(CommentEligibilityError::NoFinishedBooking));
    }

    #[test]
    fn test_comment_eligibility_with_finished_booking_succeeds() {
        let now = Utc::now();
        let finished = booking(
            1,
            now - Duration::days(3),
            now - Duration::days(1),
            BookingStatus::Approved,
        );
        assert!(check_comment_eligibility(&[finished], now).is_ok());
    }

    #[test]
    fn test_comment_eligibility_with_unfinished_booking_fails() {
        let now = Utc::now();
        let running = booking(
            1,
            now - Duration::days(1),
            now + Duration::days(1),
            BookingStatus::Approved,
        );
        assert_eq!(
            check_comment_eligibility(&[running], now),
            Err(CommentEligibilityError::BookingNotFinished)
        );
    }
}
