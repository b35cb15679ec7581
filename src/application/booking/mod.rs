mod booking_queries;
mod booking_service;

pub use booking_queries::{
    find_last_and_next_bookings, list_bookings_for_booker, list_bookings_for_owner,
    validate_bookings_for_comment,
};
pub use booking_service::{approve_booking, create_booking, find_booking};
