mod user_service;

pub use user_service::{create_user, delete_user, find_user, list_users, update_user};
