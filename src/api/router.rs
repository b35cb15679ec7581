use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, add_comment, approve_booking, create_booking, create_item, create_item_request,
    create_user, delete_user, get_booking, get_item, get_item_request, get_user,
    list_bookings_for_booker, list_bookings_for_owner, list_other_item_requests,
    list_own_item_requests, list_owner_items, list_users, search_items, update_item, update_user,
};

/// Creates the API router with all ShareIt endpoints
///
/// Every route except `/health` and `/users` expects the caller's id in the
/// `X-Sharer-User-Id` header.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // User directory
        .route("/users", post(create_user).get(list_users))
        .route(
            "/users/:id",
            get(get_user).patch(update_user).delete(delete_user),
        )
        // Item catalog
        .route("/items", post(create_item).get(list_owner_items))
        .route("/items/search", get(search_items))
        .route("/items/:id", get(get_item).patch(update_item))
        .route("/items/:id/comment", post(add_comment))
        // Item request board
        .route(
            "/requests",
            post(create_item_request).get(list_own_item_requests),
        )
        .route("/requests/all", get(list_other_item_requests))
        .route("/requests/:id", get(get_item_request))
        // Booking lifecycle
        .route(
            "/bookings",
            post(create_booking).get(list_bookings_for_booker),
        )
        .route("/bookings/owner", get(list_bookings_for_owner))
        .route(
            "/bookings/:id",
            get(get_booking).patch(approve_booking),
        )
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
