use crate::application::{self, ServiceDependencies};
use crate::domain::{BookingId, ItemId, ItemRequestId, UserId, commands::ApproveBooking};
use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use std::sync::Arc;

use super::{
    error::ApiError,
    extract::{ApiJson, ApiPath, ApiQuery, SharerUserId},
    types::{
        ApproveBookingQuery, BookItemRequest, BookingResponse, CommentRequest, CommentResponse,
        CreateItemRequestBody, CreateUserRequest, ItemRequestRequest, ItemRequestResponse,
        ItemResponse, ListBookingsQuery, PageQuery, SearchQuery, UpdateItemRequest,
        UpdateUserRequest, UserResponse,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

type Created<T> = (StatusCode, Json<T>);

// ============================================================================
// Users
// ============================================================================

/// POST /users - ユーザーを登録
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<Created<UserResponse>, ApiError> {
    let cmd = req.into_command()?;
    let user = application::user::create_user(&state.service_deps, cmd).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// GET /users - ユーザー一覧
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = application::user::list_users(&state.service_deps).await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /users/:id
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = application::user::find_user(&state.service_deps, UserId::new(user_id)).await?;

    Ok(Json(UserResponse::from(user)))
}

/// PATCH /users/:id - 部分更新
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let cmd = req.into_command(UserId::new(user_id))?;
    let user = application::user::update_user(&state.service_deps, cmd).await?;

    Ok(Json(UserResponse::from(user)))
}

/// DELETE /users/:id
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    application::user::delete_user(&state.service_deps, UserId::new(user_id)).await?;

    Ok(StatusCode::OK)
}

// ============================================================================
// Items
// ============================================================================

/// POST /items - アイテムを出品
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    SharerUserId(owner_id): SharerUserId,
    ApiJson(req): ApiJson<CreateItemRequestBody>,
) -> Result<Created<ItemResponse>, ApiError> {
    let cmd = req.into_command(owner_id)?;
    let item = application::item::create_item(&state.service_deps, cmd).await?;

    Ok((StatusCode::CREATED, Json(ItemResponse::from(item))))
}

/// GET /items - 自分のアイテム一覧
pub async fn list_owner_items(
    State(state): State<Arc<AppState>>,
    SharerUserId(owner_id): SharerUserId,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> Result<Json<Vec<ItemResponse>>, ApiError> {
    let (from, size) = page.resolve()?;
    let items =
        application::item::list_owner_items(&state.service_deps, owner_id, from, size).await?;

    Ok(Json(items.into_iter().map(ItemResponse::from).collect()))
}

/// GET /items/search?text= - 貸出可能なアイテムを検索
pub async fn search_items(
    State(state): State<Arc<AppState>>,
    SharerUserId(_): SharerUserId,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> Result<Json<Vec<ItemResponse>>, ApiError> {
    let (from, size) = query.page().resolve()?;
    let items =
        application::item::search_items(&state.service_deps, &query.text, from, size).await?;

    Ok(Json(items.into_iter().map(ItemResponse::from).collect()))
}

/// GET /items/:id
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    SharerUserId(viewer_id): SharerUserId,
    ApiPath(item_id): ApiPath<i64>,
) -> Result<Json<ItemResponse>, ApiError> {
    let item =
        application::item::find_item(&state.service_deps, viewer_id, ItemId::new(item_id)).await?;

    Ok(Json(ItemResponse::from(item)))
}

/// PATCH /items/:id - 所有者による部分更新
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    SharerUserId(owner_id): SharerUserId,
    ApiPath(item_id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateItemRequest>,
) -> Result<Json<ItemResponse>, ApiError> {
    let cmd = req.into_command(owner_id, ItemId::new(item_id));
    let item = application::item::update_item(&state.service_deps, cmd).await?;

    Ok(Json(ItemResponse::from(item)))
}

/// POST /items/:id/comment - 貸出終了後のコメント
pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    SharerUserId(author_id): SharerUserId,
    ApiPath(item_id): ApiPath<i64>,
    ApiJson(req): ApiJson<CommentRequest>,
) -> Result<Created<CommentResponse>, ApiError> {
    let cmd = req.into_command(author_id, ItemId::new(item_id))?;
    let comment = application::item::add_comment(&state.service_deps, cmd).await?;

    Ok((StatusCode::CREATED, Json(CommentResponse::from(comment))))
}

// ============================================================================
// Item requests
// ============================================================================

/// POST /requests - アイテムリクエストを登録
pub async fn create_item_request(
    State(state): State<Arc<AppState>>,
    SharerUserId(requester_id): SharerUserId,
    ApiJson(req): ApiJson<ItemRequestRequest>,
) -> Result<Created<ItemRequestResponse>, ApiError> {
    let cmd = req.into_command(requester_id)?;
    let request = application::item_request::create_item_request(&state.service_deps, cmd).await?;

    Ok((StatusCode::CREATED, Json(ItemRequestResponse::from(request))))
}

/// GET /requests - 自分のリクエスト一覧
pub async fn list_own_item_requests(
    State(state): State<Arc<AppState>>,
    SharerUserId(requester_id): SharerUserId,
) -> Result<Json<Vec<ItemRequestResponse>>, ApiError> {
    let requests =
        application::item_request::list_own_item_requests(&state.service_deps, requester_id)
            .await?;

    Ok(Json(
        requests.into_iter().map(ItemRequestResponse::from).collect(),
    ))
}

/// GET /requests/all - 他のユーザーのリクエスト一覧
pub async fn list_other_item_requests(
    State(state): State<Arc<AppState>>,
    SharerUserId(viewer_id): SharerUserId,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> Result<Json<Vec<ItemRequestResponse>>, ApiError> {
    let (from, size) = page.resolve()?;
    let requests = application::item_request::list_other_item_requests(
        &state.service_deps,
        viewer_id,
        from,
        size,
    )
    .await?;

    Ok(Json(
        requests.into_iter().map(ItemRequestResponse::from).collect(),
    ))
}

/// GET /requests/:id
pub async fn get_item_request(
    State(state): State<Arc<AppState>>,
    SharerUserId(viewer_id): SharerUserId,
    ApiPath(request_id): ApiPath<i64>,
) -> Result<Json<ItemRequestResponse>, ApiError> {
    let request = application::item_request::find_item_request(
        &state.service_deps,
        viewer_id,
        ItemRequestId::new(request_id),
    )
    .await?;

    Ok(Json(ItemRequestResponse::from(request)))
}

// ============================================================================
// Bookings
// ============================================================================

/// POST /bookings - 予約を申し込む
///
/// 開始日時が過去の場合は境界で400。
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    SharerUserId(booker_id): SharerUserId,
    ApiJson(req): ApiJson<BookItemRequest>,
) -> Result<Created<BookingResponse>, ApiError> {
    let cmd = req.into_command(booker_id, Utc::now())?;
    let booking = application::booking::create_booking(&state.service_deps, cmd).await?;

    Ok((StatusCode::CREATED, Json(BookingResponse::from(booking))))
}

/// PATCH /bookings/:id?approved=bool - 所有者による承認・却下
pub async fn approve_booking(
    State(state): State<Arc<AppState>>,
    SharerUserId(owner_id): SharerUserId,
    ApiPath(booking_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<ApproveBookingQuery>,
) -> Result<Json<BookingResponse>, ApiError> {
    let cmd = ApproveBooking {
        owner_id,
        booking_id: BookingId::new(booking_id),
        approved: query.approved,
    };
    let booking = application::booking::approve_booking(&state.service_deps, cmd).await?;

    Ok(Json(BookingResponse::from(booking)))
}

/// GET /bookings/:id - 予約者またはアイテム所有者のみ
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    SharerUserId(viewer_id): SharerUserId,
    ApiPath(booking_id): ApiPath<i64>,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking = application::booking::find_booking(
        &state.service_deps,
        BookingId::new(booking_id),
        viewer_id,
    )
    .await?;

    Ok(Json(BookingResponse::from(booking)))
}

/// GET /bookings?state= - 予約者としての一覧
pub async fn list_bookings_for_booker(
    State(state): State<Arc<AppState>>,
    SharerUserId(booker_id): SharerUserId,
    ApiQuery(query): ApiQuery<ListBookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let (from, size) = query.page().resolve()?;
    let bookings = application::booking::list_bookings_for_booker(
        &state.service_deps,
        booker_id,
        query.state.as_deref(),
        from,
        size,
    )
    .await?;

    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

/// GET /bookings/owner?state= - 所有者としての一覧
pub async fn list_bookings_for_owner(
    State(state): State<Arc<AppState>>,
    SharerUserId(owner_id): SharerUserId,
    ApiQuery(query): ApiQuery<ListBookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let (from, size) = query.page().resolve()?;
    let bookings = application::booking::list_bookings_for_owner(
        &state.service_deps,
        owner_id,
        query.state.as_deref(),
        from,
        size,
    )
    .await?;

    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}
