pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod types;

pub use error::ApiError;
pub use extract::{SHARER_USER_ID_HEADER, SharerUserId};
pub use router::create_router;
