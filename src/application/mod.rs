pub mod booking;
mod dependencies;
mod errors;
pub mod item;
pub mod item_request;
pub mod user;

pub use dependencies::{ServiceDependencies, get_existing_item, get_existing_user};
pub use errors::{ApplicationError, ErrorKind, Result};
