use crate::domain::{
    self, BookingId, ItemId, UserId,
    booking::{Booking, BookingQuery, BookingStatus, NewBooking},
};
use crate::ports::booking_repository::{BookingRepository as BookingRepositoryTrait, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::database::{BookingRow, InMemoryDatabase};

/// In-memory implementation of BookingRepository
///
/// Filtering and ordering reuse the predicates defined on `BookingQuery`,
/// so results match the SQL issued by the Postgres adapter.
pub struct BookingRepository {
    db: InMemoryDatabase,
}

impl BookingRepository {
    pub fn new(db: InMemoryDatabase) -> Self {
        Self { db }
    }

    fn bookings_of_item(&self, item_id: ItemId) -> Result<Vec<Booking>> {
        let tables = self.db.lock()?;
        Ok(tables
            .joined_bookings()
            .into_iter()
            .filter(|b| b.item.id == item_id)
            .collect())
    }
}

#[async_trait]
impl BookingRepositoryTrait for BookingRepository {
    async fn insert(&self, booking: NewBooking) -> Result<BookingId> {
        let mut tables = self.db.lock()?;
        let id = tables.next_booking_id();
        tables.bookings.insert(
            id,
            BookingRow {
                id,
                start: booking.start,
                end: booking.end,
                item_id: booking.item_id,
                booker_id: booking.booker_id,
                status: booking.status,
            },
        );
        Ok(id)
    }

    async fn find_by_id(&self, booking_id: BookingId) -> Result<Option<Booking>> {
        let tables = self.db.lock()?;
        Ok(tables
            .bookings
            .get(&booking_id)
            .and_then(|row| tables.join_booking(row)))
    }

    async fn update_status(&self, booking_id: BookingId, status: BookingStatus) -> Result<bool> {
        let mut tables = self.db.lock()?;
        match tables.bookings.get_mut(&booking_id) {
            Some(row) if row.status != status => {
                row.status = status;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn find(&self, query: &BookingQuery) -> Result<Vec<Booking>> {
        let tables = self.db.lock()?;
        let mut bookings: Vec<Booking> = tables
            .joined_bookings()
            .into_iter()
            .filter(|b| query.matches(b))
            .collect();
        bookings.sort_by(|a, b| query.compare(a, b));
        Ok(query.page.apply(bookings))
    }

    async fn find_last_for_item(
        &self,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>> {
        let bookings = self.bookings_of_item(item_id)?;
        Ok(domain::booking::select_last(&bookings, now).cloned())
    }

    async fn find_next_for_item(
        &self,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>> {
        let bookings = self.bookings_of_item(item_id)?;
        Ok(domain::booking::select_next(&bookings, now).cloned())
    }

    async fn find_finished_for_comment(
        &self,
        item_id: ItemId,
        booker_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<Booking>> {
        Ok(self
            .bookings_of_item(item_id)?
            .into_iter()
            .filter(|b| b.booker.id == booker_id && b.is_finished(now))
            .collect())
    }
}
