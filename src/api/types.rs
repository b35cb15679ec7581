use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    ItemId, ItemRequestId, UserId,
    booking::Booking,
    commands::{
        AddComment, CreateBooking, CreateItem, CreateItemRequest, CreateUser, UpdateItem,
        UpdateUser,
    },
    comment::Comment,
    item::{Item, ItemDetails, ItemPatch},
    item_request::ItemRequestWithItems,
    user::{User, UserPatch},
};

use super::error::ApiError;

pub const DEFAULT_PAGE_FROM: i64 = 0;
pub const DEFAULT_PAGE_SIZE: i64 = 10;

// ============================================================================
// 入力の検証
// ============================================================================

fn require_non_blank(field: &str, value: Option<String>) -> Result<String, ApiError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ApiError::InvalidRequest(format!("{} must not be blank", field))),
    }
}

fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.contains('@') {
        Ok(())
    } else {
        Err(ApiError::InvalidRequest(format!(
            "email must be a valid address, got '{}'",
            email
        )))
    }
}

// ============================================================================
// クエリパラメータ
// ============================================================================

/// ページ指定のクエリパラメータ（from >= 0, size > 0）
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub from: Option<i64>,
    pub size: Option<i64>,
}

impl PageQuery {
    /// 既定値を補い、範囲を検証して (from, size) を返す
    pub fn resolve(&self) -> Result<(i64, i64), ApiError> {
        let from = self.from.unwrap_or(DEFAULT_PAGE_FROM);
        let size = self.size.unwrap_or(DEFAULT_PAGE_SIZE);

        if from < 0 {
            return Err(ApiError::InvalidRequest(format!(
                "from must be zero or positive, got {}",
                from
            )));
        }
        if size <= 0 {
            return Err(ApiError::InvalidRequest(format!(
                "size must be positive, got {}",
                size
            )));
        }

        Ok((from, size))
    }
}

/// GET /items/search のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub text: String,
    pub from: Option<i64>,
    pub size: Option<i64>,
}

impl SearchQuery {
    pub fn page(&self) -> PageQuery {
        PageQuery {
            from: self.from,
            size: self.size,
        }
    }
}

/// 予約一覧のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    /// 未指定時はALL
    pub state: Option<String>,
    pub from: Option<i64>,
    pub size: Option<i64>,
}

impl ListBookingsQuery {
    pub fn page(&self) -> PageQuery {
        PageQuery {
            from: self.from,
            size: self.size,
        }
    }
}

/// PATCH /bookings/:id のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct ApproveBookingQuery {
    pub approved: bool,
}

// ============================================================================
// リクエストボディ
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl CreateUserRequest {
    pub fn into_command(self) -> Result<CreateUser, ApiError> {
        let name = require_non_blank("name", self.name)?;
        let email = require_non_blank("email", self.email)?;
        validate_email(&email)?;

        Ok(CreateUser { name, email })
    }
}

/// 部分更新：省略・空白のフィールドは変更しない
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UpdateUserRequest {
    pub fn into_command(self, user_id: UserId) -> Result<UpdateUser, ApiError> {
        if let Some(email) = self.email.as_deref().filter(|e| !e.trim().is_empty()) {
            validate_email(email)?;
        }

        Ok(UpdateUser {
            user_id,
            patch: UserPatch {
                name: self.name,
                email: self.email,
            },
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequestBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
    pub request_id: Option<i64>,
}

impl CreateItemRequestBody {
    pub fn into_command(self, owner_id: UserId) -> Result<CreateItem, ApiError> {
        let name = require_non_blank("name", self.name)?;
        let description = require_non_blank("description", self.description)?;
        let available = self
            .available
            .ok_or_else(|| ApiError::InvalidRequest("available must be specified".to_string()))?;

        Ok(CreateItem {
            owner_id,
            name,
            description,
            available,
            request_id: self.request_id.map(ItemRequestId::new),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}

impl UpdateItemRequest {
    pub fn into_command(self, owner_id: UserId, item_id: ItemId) -> UpdateItem {
        UpdateItem {
            owner_id,
            item_id,
            patch: ItemPatch {
                name: self.name,
                description: self.description,
                available: self.available,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub text: Option<String>,
}

impl CommentRequest {
    pub fn into_command(self, author_id: UserId, item_id: ItemId) -> Result<AddComment, ApiError> {
        Ok(AddComment {
            author_id,
            item_id,
            text: require_non_blank("text", self.text)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ItemRequestRequest {
    pub description: Option<String>,
}

impl ItemRequestRequest {
    pub fn into_command(self, requester_id: UserId) -> Result<CreateItemRequest, ApiError> {
        Ok(CreateItemRequest {
            requester_id,
            description: require_non_blank("description", self.description)?,
        })
    }
}

/// 予約日時の入力形式
///
/// オフセットなしのローカル日時（`2030-11-11T11:11:00`、秒は省略可）はUTCとして扱う。
/// RFC 3339 のオフセット付き表記も受け付ける。
pub mod booking_time {
    use chrono::{DateTime, NaiveDateTime, ParseError, Utc};
    use serde::{Deserialize, Deserializer, de::Error};

    const WITHOUT_SECONDS: &str = "%Y-%m-%dT%H:%M";

    pub fn parse(value: &str) -> Result<DateTime<Utc>, ParseError> {
        if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
            return Ok(with_offset.with_timezone(&Utc));
        }

        value
            .parse::<NaiveDateTime>()
            .or_else(|_| NaiveDateTime::parse_from_str(value, WITHOUT_SECONDS))
            .map(|local| local.and_utc())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| {
                parse(&raw)
                    .map_err(|e| D::Error::custom(format!("invalid date-time '{}': {}", raw, e)))
            })
            .transpose()
    }
}

/// POST /bookings のボディ
///
/// 開始・終了はどちらも必須で、開始は現在時刻以降であること。
/// 終了が開始より後であることはアプリケーション層で検証する。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookItemRequest {
    pub item_id: i64,
    #[serde(default, deserialize_with = "booking_time::deserialize")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "booking_time::deserialize")]
    pub end: Option<DateTime<Utc>>,
}

impl BookItemRequest {
    pub fn into_command(
        self,
        booker_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<CreateBooking, ApiError> {
        let start = self
            .start
            .ok_or_else(|| ApiError::InvalidRequest("start must be specified".to_string()))?;
        let end = self
            .end
            .ok_or_else(|| ApiError::InvalidRequest("end must be specified".to_string()))?;

        if start < now {
            return Err(ApiError::InvalidRequest(
                "start must not be in the past".to_string(),
            ));
        }

        Ok(CreateBooking {
            booker_id,
            item_id: ItemId::new(self.item_id),
            start,
            end,
        })
    }
}

// ============================================================================
// レスポンス
// ============================================================================

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.value(),
            name: user.name,
            email: user.email,
        }
    }
}

/// アイテムの直近・次回予約として埋め込む短い形
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortBookingResponse {
    pub id: i64,
    pub booker_id: i64,
    pub item_id: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl From<Booking> for ShortBookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id.value(),
            booker_id: booking.booker.id.value(),
            item_id: booking.item.id.value(),
            start: booking.start,
            end: booking.end,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: i64,
    pub text: String,
    pub author_name: String,
    pub created: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id.value(),
            text: comment.text,
            author_name: comment.author_name,
            created: comment.created,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub request_id: Option<i64>,
    pub last_booking: Option<ShortBookingResponse>,
    pub next_booking: Option<ShortBookingResponse>,
    pub comments: Vec<CommentResponse>,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id.value(),
            name: item.name,
            description: item.description,
            available: item.available,
            request_id: item.request_id.map(|id| id.value()),
            last_booking: None,
            next_booking: None,
            comments: Vec::new(),
        }
    }
}

impl From<ItemDetails> for ItemResponse {
    fn from(details: ItemDetails) -> Self {
        Self {
            last_booking: details.last_booking.map(ShortBookingResponse::from),
            next_booking: details.next_booking.map(ShortBookingResponse::from),
            comments: details
                .comments
                .into_iter()
                .map(CommentResponse::from)
                .collect(),
            ..ItemResponse::from(details.item)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub item: ItemResponse,
    pub booker: UserResponse,
    pub status: String,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id.value(),
            start: booking.start,
            end: booking.end,
            item: ItemResponse::from(booking.item),
            booker: UserResponse::from(booking.booker),
            status: booking.status.as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ItemRequestResponse {
    pub id: i64,
    pub description: String,
    pub created: DateTime<Utc>,
    pub items: Vec<ItemResponse>,
}

impl From<ItemRequestWithItems> for ItemRequestResponse {
    fn from(value: ItemRequestWithItems) -> Self {
        Self {
            id: value.request.id.value(),
            description: value.request.description,
            created: value.request.created,
            items: value.items.into_iter().map(ItemResponse::from).collect(),
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
