use actix_web::{get, web, HttpResponse};

use crate::{
    db::{
        models::{document_to_json, documents_to_json},
        RecordStore,
    },
    error::{BookingServerError, Result},
};

#[get("/api/v1/services")]
pub async fn list_services(store: web::Data<RecordStore>) -> Result<HttpResponse> {
    let services = store.services().find_all().await?;

    log::debug!(
        "Listed {} documents from '{}'",
        services.len(),
        store.services().collection_name()
    );

    Ok(HttpResponse::Ok().json(documents_to_json(services)))
}

#[get("/api/v1/services/{id}")]
pub async fn get_service(
    path: web::Path<String>,
    store: web::Data<RecordStore>,
) -> Result<HttpResponse> {
    let id = path.into_inner();

    let service = store
        .services()
        .find_by_id(&id)
        .await?
        .ok_or(BookingServerError::NotFound("Service not found"))?;

    Ok(HttpResponse::Ok().json(document_to_json(service)))
}
