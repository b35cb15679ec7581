mod item_request_service;

pub use item_request_service::{
    create_item_request, find_item_request, list_other_item_requests, list_own_item_requests,
};
