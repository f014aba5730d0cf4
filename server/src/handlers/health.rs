use actix_web::{get, web, HttpResponse};
use serde::Serialize;

use crate::{db::RecordStore, error::Result};

#[get("/")]
pub async fn root() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Server is running")
}

#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub database: String,
}

#[get("/health")]
pub async fn health_check(store: web::Data<RecordStore>) -> Result<HttpResponse> {
    match store.ping().await {
        Ok(()) => Ok(HttpResponse::Ok().json(HealthCheckResponse {
            status: "healthy".to_string(),
            database: "ok".to_string(),
        })),
        Err(err) => {
            log::error!("Health check failed: {}", err);
            Ok(HttpResponse::ServiceUnavailable().json(HealthCheckResponse {
                status: "degraded".to_string(),
                database: "unavailable".to_string(),
            }))
        }
    }
}
