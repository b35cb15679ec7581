use chrono::Utc;
use futures::future::try_join_all;

use crate::domain::{
    ItemRequestId, PageRequest, UserId,
    commands::CreateItemRequest,
    item_request::{ItemRequest, ItemRequestWithItems, NewItemRequest},
};

use super::super::dependencies::{ServiceDependencies, get_existing_user};
use super::super::errors::{ApplicationError, Result};
use super::super::item::find_items_for_request;

/// アイテムリクエストを登録する
///
/// 作成日時は登録時刻。応えたアイテムはまだないため空の一覧を返す。
pub async fn create_item_request(
    deps: &ServiceDependencies,
    cmd: CreateItemRequest,
) -> Result<ItemRequestWithItems> {
    let requester = get_existing_user(deps, cmd.requester_id).await?;

    let request = deps
        .item_request_repository
        .insert(NewItemRequest {
            description: cmd.description,
            requester_id: requester.id,
            created: Utc::now(),
        })
        .await
        .map_err(ApplicationError::RepositoryError)?;

    tracing::info!(request_id = %request.id, requester_id = %requester.id, "item request created");

    Ok(ItemRequestWithItems {
        request,
        items: Vec::new(),
    })
}

/// IDでアイテムリクエストを取得する（応えたアイテム付き）
pub async fn find_item_request(
    deps: &ServiceDependencies,
    viewer_id: UserId,
    request_id: ItemRequestId,
) -> Result<ItemRequestWithItems> {
    get_existing_user(deps, viewer_id).await?;

    let request = deps
        .item_request_repository
        .find_by_id(request_id)
        .await
        .map_err(ApplicationError::RepositoryError)?
        .ok_or(ApplicationError::ItemRequestNotFound(request_id))?;

    with_items(deps, request).await
}

/// 自分のアイテムリクエスト一覧（作成日時の降順）
pub async fn list_own_item_requests(
    deps: &ServiceDependencies,
    requester_id: UserId,
) -> Result<Vec<ItemRequestWithItems>> {
    get_existing_user(deps, requester_id).await?;

    let requests = deps
        .item_request_repository
        .find_by_requester(requester_id)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    try_join_all(requests.into_iter().map(|request| with_items(deps, request))).await
}

/// 他のユーザーのアイテムリクエスト一覧（作成日時の降順、ページ指定）
pub async fn list_other_item_requests(
    deps: &ServiceDependencies,
    viewer_id: UserId,
    from: i64,
    size: i64,
) -> Result<Vec<ItemRequestWithItems>> {
    get_existing_user(deps, viewer_id).await?;
    let page = PageRequest::new(from, size)?;

    let requests = deps
        .item_request_repository
        .find_from_others(viewer_id, page)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    try_join_all(requests.into_iter().map(|request| with_items(deps, request))).await
}

async fn with_items(
    deps: &ServiceDependencies,
    request: ItemRequest,
) -> Result<ItemRequestWithItems> {
    let items = find_items_for_request(deps, request.id).await?;
    Ok(ItemRequestWithItems { request, items })
}
