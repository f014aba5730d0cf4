pub mod auth;
pub mod bookings;
pub mod health;
pub mod services;

pub use auth::{current_session, issue_token, logout};
pub use bookings::{create_booking, delete_booking, get_booking, list_bookings};
pub use health::{health_check, root};
pub use services::{get_service, list_services};
