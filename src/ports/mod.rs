pub mod booking_repository;
pub mod comment_repository;
pub mod item_repository;
pub mod item_request_repository;
pub mod user_repository;

pub use booking_repository::BookingRepository;
pub use comment_repository::CommentRepository;
pub use item_repository::ItemRepository;
pub use item_request_repository::ItemRequestRepository;
pub use user_repository::UserRepository;
