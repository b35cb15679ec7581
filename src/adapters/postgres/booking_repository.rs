use crate::domain::{
    BookingId, ItemId, UserId,
    booking::{Booking, BookingFilter, BookingQuery, BookingScope, BookingStatus, NewBooking},
};
use crate::ports::booking_repository::{BookingRepository as BookingRepositoryTrait, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::rows::{BOOKING_SELECT, map_row_to_booking};

/// BookingRepositoryのPostgreSQL実装
///
/// 一覧の絞り込みと並び順は `BookingQuery` からSQLを組み立てる。
/// インメモリ実装は同じ記述子の述語を使うため、両者の結果は一致する。
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// 記述子からSELECT文を組み立てる
fn build_find_query(query: &BookingQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(BOOKING_SELECT);

    match query.scope {
        BookingScope::Booker(user_id) => {
            builder.push(" WHERE b.booker_id = ").push_bind(user_id.value());
        }
        BookingScope::ItemOwner(user_id) => {
            builder.push(" WHERE i.owner_id = ").push_bind(user_id.value());
        }
    }

    match query.filter {
        BookingFilter::All => {}
        BookingFilter::Current { now } => {
            builder
                .push(" AND b.start_date <= ")
                .push_bind(now)
                .push(" AND b.end_date >= ")
                .push_bind(now);
        }
        BookingFilter::Past { now } => {
            builder.push(" AND b.end_date < ").push_bind(now);
        }
        BookingFilter::Future { now } => {
            builder.push(" AND b.start_date > ").push_bind(now);
        }
        BookingFilter::Status(status) => {
            builder.push(" AND b.status = ").push_bind(status.as_str());
        }
    }

    let direction = query.direction.as_sql();
    builder.push(format!(
        " ORDER BY b.start_date {direction}, b.id {direction}"
    ));
    builder
        .push(" LIMIT ")
        .push_bind(query.page.limit())
        .push(" OFFSET ")
        .push_bind(query.page.offset());

    builder
}

#[async_trait]
impl BookingRepositoryTrait for BookingRepository {
    async fn insert(&self, booking: NewBooking) -> Result<BookingId> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO bookings (start_date, end_date, item_id, booker_id, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(booking.start)
        .bind(booking.end)
        .bind(booking.item_id.value())
        .bind(booking.booker_id.value())
        .bind(booking.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(BookingId::new(id))
    }

    async fn find_by_id(&self, booking_id: BookingId) -> Result<Option<Booking>> {
        let sql = format!("{BOOKING_SELECT} WHERE b.id = $1");
        let row = sqlx::query(&sql)
            .bind(booking_id.value())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_row_to_booking).transpose()
    }

    /// 条件付きUPDATE
    ///
    /// 同じステータスへの同時更新は片方だけが成功する。
    async fn update_status(&self, booking_id: BookingId, status: BookingStatus) -> Result<bool> {
        let result = sqlx::query("UPDATE bookings SET status = $2 WHERE id = $1 AND status <> $2")
            .bind(booking_id.value())
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find(&self, query: &BookingQuery) -> Result<Vec<Booking>> {
        let mut builder = build_find_query(query);
        let rows = builder.build().fetch_all(&self.pool).await?;

        rows.iter().map(map_row_to_booking).collect()
    }

    async fn find_last_for_item(
        &self,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>> {
        let sql = format!(
            "{BOOKING_SELECT} WHERE b.item_id = $1 AND b.start_date <= $2 \
             ORDER BY b.start_date DESC, b.id DESC LIMIT 1"
        );
        let row = sqlx::query(&sql)
            .bind(item_id.value())
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_row_to_booking).transpose()
    }

    async fn find_next_for_item(
        &self,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>> {
        let sql = format!(
            "{BOOKING_SELECT} WHERE b.item_id = $1 AND b.start_date > $2 \
             ORDER BY b.start_date ASC, b.id ASC LIMIT 1"
        );
        let row = sqlx::query(&sql)
            .bind(item_id.value())
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_row_to_booking).transpose()
    }

    async fn find_finished_for_comment(
        &self,
        item_id: ItemId,
        booker_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<Booking>> {
        let sql = format!(
            "{BOOKING_SELECT} WHERE b.item_id = $1 AND b.booker_id = $2 AND b.end_date < $3 \
             ORDER BY b.start_date DESC, b.id DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(item_id.value())
            .bind(booker_id.value())
            .bind(now)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(map_row_to_booking).collect()
    }
}
