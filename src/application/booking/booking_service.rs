use crate::domain::{
    self, BookingId, UserId,
    booking::{Booking, BookingStatus},
    commands::{ApproveBooking, CreateBooking},
};

use super::super::dependencies::{ServiceDependencies, get_existing_item, get_existing_user};
use super::super::errors::{ApplicationError, Result, from_create_booking_error};

/// 既存の予約を取得する（存在しなければ BookingNotFound）
pub(crate) async fn get_existing_booking(
    deps: &ServiceDependencies,
    booking_id: BookingId,
) -> Result<Booking> {
    deps.booking_repository
        .find_by_id(booking_id)
        .await
        .map_err(ApplicationError::RepositoryError)?
        .ok_or(ApplicationError::BookingNotFound(booking_id))
}

/// 予約を申し込む
///
/// ビジネスルール：
/// - アイテムが存在すること
/// - 申込者が存在すること
/// - 申込者がアイテムの所有者でないこと（所有者の場合はNotFound扱い）
/// - アイテムが貸出可能であること
/// - 終了日時が開始日時より後であること
///
/// 同じアイテム・期間の重複予約は検出しない。
///
/// # 戻り値
/// WAITING状態で作成された予約（アイテムと予約者を結合済み）
pub async fn create_booking(deps: &ServiceDependencies, cmd: CreateBooking) -> Result<Booking> {
    // 1. アイテムと申込者の存在確認
    let item = get_existing_item(deps, cmd.item_id).await?;
    let booker = get_existing_user(deps, cmd.booker_id).await?;

    // 2. ドメイン層の純粋関数で申込を検証
    let new_booking = domain::booking::request_booking(&item, booker.id, cmd.start, cmd.end)
        .map_err(|e| from_create_booking_error(e, item.id))?;

    // 3. 保存
    let booking_id = deps
        .booking_repository
        .insert(new_booking.clone())
        .await
        .map_err(ApplicationError::RepositoryError)?;

    tracing::info!(
        booking_id = %booking_id,
        item_id = %item.id,
        booker_id = %booker.id,
        "booking created"
    );

    Ok(Booking {
        id: booking_id,
        start: new_booking.start,
        end: new_booking.end,
        item,
        booker,
        status: new_booking.status,
    })
}

/// 予約を承認・却下する
///
/// ビジネスルール：
/// - 予約が存在すること
/// - 操作者がアイテムの所有者であること（違う場合はNotFound扱い）
/// - ステータス遷移が遷移表で許可されていること（同じ値の再適用は不可）
pub async fn approve_booking(deps: &ServiceDependencies, cmd: ApproveBooking) -> Result<Booking> {
    // 1. 予約とアイテムを取得
    let booking = get_existing_booking(deps, cmd.booking_id).await?;
    let item = get_existing_item(deps, booking.item.id).await?;

    // 2. 所有者確認
    if !item.is_owned_by(cmd.owner_id) {
        return Err(ApplicationError::NotItemOwner(item.id));
    }

    // 3. ステータス遷移
    let target = BookingStatus::from_decision(cmd.approved);
    let status = domain::booking::transition(booking.status, target)?;

    // 4. 保存（現在値が異なる場合のみ書き換わる）
    let updated = deps
        .booking_repository
        .update_status(booking.id, status)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    if !updated {
        // 読み取りから書き込みまでの間に同じステータスが設定された
        return Err(ApplicationError::StatusAlreadySet(status));
    }

    tracing::info!(
        booking_id = %booking.id,
        from = %booking.status,
        to = %status,
        "booking status changed"
    );

    Ok(Booking {
        status,
        item,
        ..booking
    })
}

/// IDで予約を取得する
///
/// 閲覧できるのは予約者とアイテム所有者のみ（それ以外はNotFound扱い）。
pub async fn find_booking(
    deps: &ServiceDependencies,
    booking_id: BookingId,
    viewer_id: UserId,
) -> Result<Booking> {
    get_existing_user(deps, viewer_id).await?;
    let booking = get_existing_booking(deps, booking_id).await?;

    if !booking.is_visible_to(viewer_id) {
        return Err(ApplicationError::BookingAccessDenied);
    }

    Ok(booking)
}
