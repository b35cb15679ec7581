mod comment_service;
mod item_service;

pub use comment_service::add_comment;
pub use item_service::{
    create_item, find_item, find_items_for_request, list_owner_items, search_items, update_item,
};
