use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::{
    BookingId, CommentId, ItemId, ItemRequestId, UserId,
    booking::{Booking, BookingStatus},
    comment::Comment,
    item::Item,
    item_request::ItemRequest,
    user::User,
};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Booking row as stored; item and booker are joined on read.
#[derive(Debug, Clone)]
pub(crate) struct BookingRow {
    pub id: BookingId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub item_id: ItemId,
    pub booker_id: UserId,
    pub status: BookingStatus,
}

/// Comment row as stored; the author name is joined on read.
#[derive(Debug, Clone)]
pub(crate) struct CommentRow {
    pub id: CommentId,
    pub text: String,
    pub item_id: ItemId,
    pub author_id: UserId,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub users: BTreeMap<UserId, User>,
    pub items: BTreeMap<ItemId, Item>,
    pub bookings: BTreeMap<BookingId, BookingRow>,
    pub requests: BTreeMap<ItemRequestId, ItemRequest>,
    pub comments: BTreeMap<CommentId, CommentRow>,
    sequences: Sequences,
}

/// Per-table id sequences, starting at 1 like BIGSERIAL.
#[derive(Debug, Default)]
struct Sequences {
    users: i64,
    items: i64,
    bookings: i64,
    requests: i64,
    comments: i64,
}

fn next(sequence: &mut i64) -> i64 {
    *sequence += 1;
    *sequence
}

impl Tables {
    pub fn next_user_id(&mut self) -> UserId {
        UserId::new(next(&mut self.sequences.users))
    }

    pub fn next_item_id(&mut self) -> ItemId {
        ItemId::new(next(&mut self.sequences.items))
    }

    pub fn next_booking_id(&mut self) -> BookingId {
        BookingId::new(next(&mut self.sequences.bookings))
    }

    pub fn next_request_id(&mut self) -> ItemRequestId {
        ItemRequestId::new(next(&mut self.sequences.requests))
    }

    pub fn next_comment_id(&mut self) -> CommentId {
        CommentId::new(next(&mut self.sequences.comments))
    }

    pub fn join_booking(&self, row: &BookingRow) -> Option<Booking> {
        let item = self.items.get(&row.item_id)?.clone();
        let booker = self.users.get(&row.booker_id)?.clone();

        Some(Booking {
            id: row.id,
            start: row.start,
            end: row.end,
            item,
            booker,
            status: row.status,
        })
    }

    pub fn joined_bookings(&self) -> Vec<Booking> {
        self.bookings
            .values()
            .filter_map(|row| self.join_booking(row))
            .collect()
    }

    pub fn join_comment(&self, row: &CommentRow) -> Option<Comment> {
        let author = self.users.get(&row.author_id)?;

        Some(Comment {
            id: row.id,
            text: row.text.clone(),
            item_id: row.item_id,
            author_id: row.author_id,
            author_name: author.name.clone(),
            created: row.created,
        })
    }

    /// Removes a user and everything that references it, mirroring ON DELETE CASCADE.
    pub fn delete_user_cascade(&mut self, user_id: UserId) -> bool {
        if self.users.remove(&user_id).is_none() {
            return false;
        }

        let owned_items: Vec<ItemId> = self
            .items
            .values()
            .filter(|item| item.owner_id == user_id)
            .map(|item| item.id)
            .collect();

        self.items.retain(|_, item| item.owner_id != user_id);
        self.bookings
            .retain(|_, b| b.booker_id != user_id && !owned_items.contains(&b.item_id));
        self.comments
            .retain(|_, c| c.author_id != user_id && !owned_items.contains(&c.item_id));

        let own_requests: Vec<_> = self
            .requests
            .values()
            .filter(|r| r.requester_id == user_id)
            .map(|r| r.id)
            .collect();
        self.requests.retain(|_, r| r.requester_id != user_id);
        for item in self.items.values_mut() {
            if item.request_id.is_some_and(|id| own_requests.contains(&id)) {
                item.request_id = None;
            }
        }

        true
    }
}

/// In-memory store shared by all in-memory repositories.
///
/// Cloning is cheap; every clone sees the same tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|e| format!("in-memory database lock poisoned: {}", e).into())
    }
}
