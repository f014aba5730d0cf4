pub mod memory;
pub mod models;
pub mod repository;

use std::sync::Arc;

pub use memory::MemoryRepository;
pub use models::{DeleteAck, InsertAck};
pub use repository::{DocumentRepository, MongoDbContext, MongoRepository};

use crate::error::Result;

/// The two collections this server exposes, opened once at startup and shared
/// by every worker through `web::Data`.
#[derive(Clone)]
pub struct RecordStore {
    services: Arc<dyn DocumentRepository>,
    bookings: Arc<dyn DocumentRepository>,
}

impl RecordStore {
    pub fn new(
        services: Arc<dyn DocumentRepository>,
        bookings: Arc<dyn DocumentRepository>,
    ) -> Self {
        Self { services, bookings }
    }

    pub fn mongo(context: &MongoDbContext) -> Self {
        Self::new(Arc::new(context.services()), Arc::new(context.bookings()))
    }

    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryRepository::new(models::SERVICES_COLLECTION)),
            Arc::new(MemoryRepository::new(models::BOOKINGS_COLLECTION)),
        )
    }

    pub fn services(&self) -> &dyn DocumentRepository {
        self.services.as_ref()
    }

    pub fn bookings(&self) -> &dyn DocumentRepository {
        self.bookings.as_ref()
    }

    pub async fn ping(&self) -> Result<()> {
        self.services.ping().await
    }
}
