use futures::future::try_join_all;

use crate::domain::{
    ItemId, ItemRequestId, PageRequest, UserId,
    commands::{CreateItem, UpdateItem},
    comment::Comment,
    item::{Item, ItemDetails, NewItem},
};

use super::super::booking::find_last_and_next_bookings;
use super::super::dependencies::{ServiceDependencies, get_existing_item, get_existing_user};
use super::super::errors::{ApplicationError, Result};

/// アイテムを出品する
///
/// ビジネスルール：
/// - 所有者が存在すること
/// - リクエストIDが指定されている場合、そのリクエストが存在すること
pub async fn create_item(deps: &ServiceDependencies, cmd: CreateItem) -> Result<Item> {
    get_existing_user(deps, cmd.owner_id).await?;

    if let Some(request_id) = cmd.request_id {
        deps.item_request_repository
            .find_by_id(request_id)
            .await
            .map_err(ApplicationError::RepositoryError)?
            .ok_or(ApplicationError::ItemRequestNotFound(request_id))?;
    }

    let item = deps
        .item_repository
        .insert(NewItem {
            name: cmd.name,
            description: cmd.description,
            available: cmd.available,
            owner_id: cmd.owner_id,
            request_id: cmd.request_id,
        })
        .await
        .map_err(ApplicationError::RepositoryError)?;

    tracing::info!(item_id = %item.id, owner_id = %item.owner_id, "item created");

    Ok(item)
}

/// アイテムを部分更新する
///
/// 所有者以外の更新は NotItemOwner（NotFound扱い）。
pub async fn update_item(deps: &ServiceDependencies, cmd: UpdateItem) -> Result<ItemDetails> {
    let item = get_existing_item(deps, cmd.item_id).await?;

    if !item.is_owned_by(cmd.owner_id) {
        return Err(ApplicationError::NotItemOwner(item.id));
    }

    let updated = cmd.patch.apply(&item);
    deps.item_repository
        .update(&updated)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    tracing::info!(item_id = %updated.id, "item updated");

    with_comments_and_bookings(deps, updated).await
}

/// IDでアイテムを取得する
///
/// コメントは常に付加する。直近・次回の予約は所有者が見る場合のみ。
pub async fn find_item(
    deps: &ServiceDependencies,
    viewer_id: UserId,
    item_id: ItemId,
) -> Result<ItemDetails> {
    get_existing_user(deps, viewer_id).await?;
    let item = get_existing_item(deps, item_id).await?;

    if item.is_owned_by(viewer_id) {
        return with_comments_and_bookings(deps, item).await;
    }

    let comments = find_comments(deps, item.id).await?;
    Ok(ItemDetails {
        item,
        last_booking: None,
        next_booking: None,
        comments,
    })
}

/// 所有者のアイテム一覧（ID昇順、ページ指定）
pub async fn list_owner_items(
    deps: &ServiceDependencies,
    owner_id: UserId,
    from: i64,
    size: i64,
) -> Result<Vec<ItemDetails>> {
    let page = PageRequest::new(from, size)?;

    let items = deps
        .item_repository
        .find_by_owner(owner_id, page)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    try_join_all(items.into_iter().map(|item| with_comments_and_bookings(deps, item))).await
}

/// 貸出可能なアイテムを名前・説明で検索する
///
/// 空白のみの検索語は問い合わせずに空の一覧を返す。
/// それ以外の検索語は前後の空白を含めてそのまま照合する。
pub async fn search_items(
    deps: &ServiceDependencies,
    text: &str,
    from: i64,
    size: i64,
) -> Result<Vec<ItemDetails>> {
    let page = PageRequest::new(from, size)?;

    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    tracing::debug!(text, "searching items");

    let items = deps
        .item_repository
        .search(text, page)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    try_join_all(items.into_iter().map(|item| with_comments_and_bookings(deps, item))).await
}

/// リクエストに応えて出品されたアイテム
pub async fn find_items_for_request(
    deps: &ServiceDependencies,
    request_id: ItemRequestId,
) -> Result<Vec<Item>> {
    deps.item_repository
        .find_by_request_id(request_id)
        .await
        .map_err(ApplicationError::RepositoryError)
}

async fn with_comments_and_bookings(deps: &ServiceDependencies, item: Item) -> Result<ItemDetails> {
    let comments = find_comments(deps, item.id).await?;
    let (last_booking, next_booking) = find_last_and_next_bookings(deps, item.id).await?;

    Ok(ItemDetails {
        item,
        last_booking,
        next_booking,
        comments,
    })
}

async fn find_comments(deps: &ServiceDependencies, item_id: ItemId) -> Result<Vec<Comment>> {
    deps.comment_repository
        .find_by_item(item_id)
        .await
        .map_err(ApplicationError::RepositoryError)
}
