use chrono::Utc;

use crate::domain::{
    self, ItemId, PageRequest, UserId,
    booking::{Booking, BookingQuery, BookingScope, BookingState},
};

use super::super::dependencies::{ServiceDependencies, get_existing_user};
use super::super::errors::{ApplicationError, Result};

/// 予約者として自分の予約一覧を取得する
///
/// `state` は大文字小文字を区別しない（未指定・空白はALL）。
/// 未知の値は UnsupportedState となり、一覧の問い合わせは行わない。
pub async fn list_bookings_for_booker(
    deps: &ServiceDependencies,
    booker_id: UserId,
    state: Option<&str>,
    from: i64,
    size: i64,
) -> Result<Vec<Booking>> {
    get_existing_user(deps, booker_id).await?;

    let state = BookingState::parse(state)?;
    let page = PageRequest::new(from, size)?;

    run_query(deps, BookingScope::Booker(booker_id), state, page).await
}

/// 所有者として自分のアイテムへの予約一覧を取得する
///
/// アイテムを1件も持たないユーザーはどのstateでも OwnsNoItems。
pub async fn list_bookings_for_owner(
    deps: &ServiceDependencies,
    owner_id: UserId,
    state: Option<&str>,
    from: i64,
    size: i64,
) -> Result<Vec<Booking>> {
    get_existing_user(deps, owner_id).await?;

    let has_items = deps
        .item_repository
        .has_items(owner_id)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    if !has_items {
        return Err(ApplicationError::OwnsNoItems);
    }

    let state = BookingState::parse(state)?;
    let page = PageRequest::new(from, size)?;

    run_query(deps, BookingScope::ItemOwner(owner_id), state, page).await
}

async fn run_query(
    deps: &ServiceDependencies,
    scope: BookingScope,
    state: BookingState,
    page: PageRequest,
) -> Result<Vec<Booking>> {
    let query = BookingQuery::for_state(scope, state, Utc::now(), page);

    tracing::debug!(?query, "listing bookings");

    deps.booking_repository
        .find(&query)
        .await
        .map_err(ApplicationError::RepositoryError)
}

/// アイテムの直近・次回の予約（読み取り時に計算）
///
/// 直近の予約がない場合、次回の予約も None になる。
pub async fn find_last_and_next_bookings(
    deps: &ServiceDependencies,
    item_id: ItemId,
) -> Result<(Option<Booking>, Option<Booking>)> {
    let now = Utc::now();

    let last = deps
        .booking_repository
        .find_last_for_item(item_id, now)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    let next = deps
        .booking_repository
        .find_next_for_item(item_id, now)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    Ok(domain::booking::couple_last_and_next(last, next))
}

/// コメント投稿の可否を確認する
///
/// 投稿者のそのアイテムの予約のうち、終了済みのものが1件もなければ不可。
pub async fn validate_bookings_for_comment(
    deps: &ServiceDependencies,
    author_id: UserId,
    item_id: ItemId,
) -> Result<()> {
    let now = Utc::now();

    let finished = deps
        .booking_repository
        .find_finished_for_comment(item_id, author_id, now)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    domain::booking::check_comment_eligibility(&finished, now)?;

    Ok(())
}
