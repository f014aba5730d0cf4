use actix_web::{delete, get, middleware::from_fn, post, web, HttpResponse};
use mongodb::bson::Document;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    db::{
        models::{document_from_json, document_to_json, documents_to_json, BOOKING_EMAIL_FIELD},
        RecordStore,
    },
    error::{BookingServerError, Result},
    middleware::auth_middleware,
};

#[derive(Debug, Deserialize)]
pub struct BookingQuery {
    pub email: Option<String>,
}

/// Without `email` every booking is returned; with it, only exact matches.
#[get("/api/v1/booking", wrap = "from_fn(auth_middleware)")]
pub async fn list_bookings(
    query: web::Query<BookingQuery>,
    store: web::Data<RecordStore>,
) -> Result<HttpResponse> {
    let mut filter = Document::new();
    if let Some(email) = query.into_inner().email {
        filter.insert(BOOKING_EMAIL_FIELD, email);
    }

    let bookings = store.bookings().find_by_filter(filter).await?;

    log::debug!(
        "Listed {} documents from '{}'",
        bookings.len(),
        store.bookings().collection_name()
    );

    Ok(HttpResponse::Ok().json(documents_to_json(bookings)))
}

#[get("/api/v1/booking/{id}", wrap = "from_fn(auth_middleware)")]
pub async fn get_booking(
    path: web::Path<String>,
    store: web::Data<RecordStore>,
) -> Result<HttpResponse> {
    let id = path.into_inner();

    let booking = store
        .bookings()
        .find_by_id(&id)
        .await?
        .ok_or(BookingServerError::NotFound("Booking not found"))?;

    Ok(HttpResponse::Ok().json(document_to_json(booking)))
}

#[post("/api/v1/booking")]
pub async fn create_booking(
    req: web::Json<Map<String, Value>>,
    store: web::Data<RecordStore>,
) -> Result<HttpResponse> {
    let document = document_from_json(req.into_inner())?;

    let ack = store.bookings().insert(document).await?;

    log::info!("Created booking {}", ack.inserted_id);

    Ok(HttpResponse::Created().json(ack))
}

#[delete("/api/v1/booking/{id}", wrap = "from_fn(auth_middleware)")]
pub async fn delete_booking(
    path: web::Path<String>,
    store: web::Data<RecordStore>,
) -> Result<HttpResponse> {
    let id = path.into_inner();

    let ack = store.bookings().delete_by_id(&id).await?;

    log::info!("Deleted booking {} (count: {})", id, ack.deleted_count);

    Ok(HttpResponse::Ok().json(ack))
}
