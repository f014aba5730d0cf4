use actix_web::{web, HttpResponse};

use crate::error::{BookingServerError, Result};
use crate::handlers;

async fn route_not_found() -> Result<HttpResponse> {
    Err(BookingServerError::NotFound("Route not found"))
}

/// Registers every route plus extractor error handlers, so malformed bodies
/// and query strings come back in the same JSON envelope as other errors.
///
/// Callers provide `web::Data<RecordStore>` and `web::Data<AuthTokenService>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        BookingServerError::BadRequest(err.to_string()).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        BookingServerError::BadRequest(err.to_string()).into()
    }))
    // Public routes
    .service(handlers::root)
    .service(handlers::health_check)
    .service(handlers::issue_token)
    .service(handlers::logout)
    .service(handlers::list_services)
    .service(handlers::get_service)
    .service(handlers::create_booking)
    // Session-gated routes (auth middleware wrapped per route)
    .service(handlers::current_session)
    .service(handlers::list_bookings)
    .service(handlers::get_booking)
    .service(handlers::delete_booking)
    .default_service(web::to(route_not_found));
}
