use crate::domain::{
    BookingId, CommentId, ItemId, ItemRequestId, UserId,
    booking::{Booking, BookingStatus},
    comment::Comment,
    item::Item,
    item_request::ItemRequest,
    user::User,
};
use sqlx::{Row, postgres::PgRow};
use std::str::FromStr;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 予約の読み取りSQL（アイテムと予約者を結合する）
///
/// 列名の衝突を避けるため、結合先の列には別名を付ける。
pub(super) const BOOKING_SELECT: &str = r#"
    SELECT
        b.id,
        b.start_date,
        b.end_date,
        b.status,
        i.id AS item_id,
        i.name AS item_name,
        i.description AS item_description,
        i.is_available AS item_is_available,
        i.owner_id AS item_owner_id,
        i.request_id AS item_request_id,
        u.id AS booker_id,
        u.name AS booker_name,
        u.email AS booker_email
    FROM bookings b
    JOIN items i ON i.id = b.item_id
    JOIN users u ON u.id = b.booker_id
"#;

pub(super) fn map_row_to_user(row: &PgRow) -> User {
    User {
        id: UserId::new(row.get("id")),
        name: row.get("name"),
        email: row.get("email"),
    }
}

pub(super) fn map_row_to_item(row: &PgRow) -> Item {
    let request_id: Option<i64> = row.get("request_id");

    Item {
        id: ItemId::new(row.get("id")),
        name: row.get("name"),
        description: row.get("description"),
        available: row.get("is_available"),
        owner_id: UserId::new(row.get("owner_id")),
        request_id: request_id.map(ItemRequestId::new),
    }
}

pub(super) fn map_row_to_item_request(row: &PgRow) -> ItemRequest {
    ItemRequest {
        id: ItemRequestId::new(row.get("id")),
        description: row.get("description"),
        requester_id: UserId::new(row.get("requester_id")),
        created: row.get("created"),
    }
}

pub(super) fn map_row_to_comment(row: &PgRow) -> Comment {
    Comment {
        id: CommentId::new(row.get("id")),
        text: row.get("text"),
        item_id: ItemId::new(row.get("item_id")),
        author_id: UserId::new(row.get("author_id")),
        author_name: row.get("author_name"),
        created: row.get("created"),
    }
}

/// `BOOKING_SELECT` の行を予約に変換する
///
/// ステータス文字列が未知の値の場合はエラー。
pub(super) fn map_row_to_booking(row: &PgRow) -> Result<Booking> {
    let status_str: &str = row.get("status");
    let status = BookingStatus::from_str(status_str).map_err(|e| {
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            as Box<dyn std::error::Error + Send + Sync>
    })?;

    let request_id: Option<i64> = row.get("item_request_id");

    Ok(Booking {
        id: BookingId::new(row.get("id")),
        start: row.get("start_date"),
        end: row.get("end_date"),
        item: Item {
            id: ItemId::new(row.get("item_id")),
            name: row.get("item_name"),
            description: row.get("item_description"),
            available: row.get("item_is_available"),
            owner_id: UserId::new(row.get("item_owner_id")),
            request_id: request_id.map(ItemRequestId::new),
        },
        booker: User {
            id: UserId::new(row.get("booker_id")),
            name: row.get("booker_name"),
            email: row.get("booker_email"),
        },
        status,
    })
}
