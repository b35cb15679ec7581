pub mod booking_repository;
pub mod comment_repository;
mod database;
pub mod item_repository;
pub mod item_request_repository;
pub mod user_repository;

pub use booking_repository::BookingRepository as InMemoryBookingRepository;
pub use comment_repository::CommentRepository as InMemoryCommentRepository;
pub use database::InMemoryDatabase;
pub use item_repository::ItemRepository as InMemoryItemRepository;
pub use item_request_repository::ItemRequestRepository as InMemoryItemRequestRepository;
pub use user_repository::UserRepository as InMemoryUserRepository;

use crate::application::ServiceDependencies;
use std::sync::Arc;

/// Wires every in-memory repository over one shared database.
pub fn service_dependencies(db: &InMemoryDatabase) -> ServiceDependencies {
    ServiceDependencies {
        user_repository: Arc::new(InMemoryUserRepository::new(db.clone())),
        item_repository: Arc::new(InMemoryItemRepository::new(db.clone())),
        booking_repository: Arc::new(InMemoryBookingRepository::new(db.clone())),
        item_request_repository: Arc::new(InMemoryItemRequestRepository::new(db.clone())),
        comment_repository: Arc::new(InMemoryCommentRepository::new(db.clone())),
    }
}
