#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use actix_web::cookie::Cookie;
use async_trait::async_trait;
use booking_server::auth_token::{AuthTokenService, ClaimsPayload};
use booking_server::db::{DeleteAck, DocumentRepository, InsertAck, MemoryRepository, RecordStore};
use booking_server::error::{BookingServerError, Result};
use booking_server::middleware::TOKEN_COOKIE;
use mongodb::bson::Document;
use serde_json::Value;

pub const TEST_SECRET: &[u8] = b"booking-test-secret-0123456789abcdef";

pub fn test_tokens() -> AuthTokenService {
    AuthTokenService::new(TEST_SECRET.to_vec(), Duration::from_secs(3600)).expect("valid secret")
}

pub fn claims(value: Value) -> ClaimsPayload {
    value.as_object().cloned().expect("claims must be a JSON object")
}

pub fn session_cookie(tokens: &AuthTokenService, value: Value) -> Cookie<'static> {
    let token = tokens.issue(claims(value)).expect("issue token");
    Cookie::new(TOKEN_COOKIE, token)
}

/// Record store backed by memory, with handles on both collections for seeding
/// and inspection.
pub struct TestStore {
    pub services: MemoryRepository,
    pub bookings: MemoryRepository,
    pub store: RecordStore,
}

pub fn test_store() -> TestStore {
    let services = MemoryRepository::new("services");
    let bookings = MemoryRepository::new("booking");
    let store = RecordStore::new(Arc::new(services.clone()), Arc::new(bookings.clone()));

    TestStore {
        services,
        bookings,
        store,
    }
}

/// Fails every call the way an unreachable database would.
pub struct FailingRepository;

fn unreachable_store() -> BookingServerError {
    BookingServerError::Internal("connection reset by peer".to_string())
}

#[async_trait]
impl DocumentRepository for FailingRepository {
    fn collection_name(&self) -> &str {
        "failing"
    }

    async fn find_by_filter(&self, _filter: Document) -> Result<Vec<Document>> {
        Err(unreachable_store())
    }

    async fn find_by_id(&self, _id: &str) -> Result<Option<Document>> {
        Err(unreachable_store())
    }

    async fn insert(&self, _document: Document) -> Result<InsertAck> {
        Err(unreachable_store())
    }

    async fn delete_by_id(&self, _id: &str) -> Result<DeleteAck> {
        Err(unreachable_store())
    }

    async fn ping(&self) -> Result<()> {
        Err(unreachable_store())
    }
}

pub fn failing_store() -> RecordStore {
    RecordStore::new(Arc::new(FailingRepository), Arc::new(FailingRepository))
}
