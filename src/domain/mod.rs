pub mod booking;
pub mod commands;
pub mod comment;
pub mod errors;
pub mod item;
pub mod item_request;
pub mod user;
pub mod value_objects;

pub use errors::*;
pub use value_objects::*;
