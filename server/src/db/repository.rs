use async_trait::async_trait;
use futures_util::stream::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    Client, Collection, Database, IndexModel,
};

use super::models::{
    parse_object_id, DeleteAck, InsertAck, BOOKINGS_COLLECTION, SERVICES_COLLECTION,
};
use crate::error::{BookingServerError, Result};

/// Schema-less access to one named collection.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    fn collection_name(&self) -> &str;

    async fn find_all(&self) -> Result<Vec<Document>> {
        self.find_by_filter(Document::new()).await
    }

    async fn find_by_filter(&self, filter: Document) -> Result<Vec<Document>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Document>>;

    async fn insert(&self, document: Document) -> Result<InsertAck>;

    async fn delete_by_id(&self, id: &str) -> Result<DeleteAck>;

    async fn ping(&self) -> Result<()>;
}

#[derive(Clone)]
pub struct MongoDbContext {
    db: Database,
}

impl MongoDbContext {
    pub fn new(client: Client, database_name: &str) -> Self {
        Self {
            db: client.database(database_name),
        }
    }

    pub fn services(&self) -> MongoRepository {
        MongoRepository::new(self.db.clone(), SERVICES_COLLECTION)
    }

    pub fn bookings(&self) -> MongoRepository {
        MongoRepository::new(self.db.clone(), BOOKINGS_COLLECTION)
    }

    pub async fn ping(&self) -> Result<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    pub async fn init_indexes(&self) -> Result<()> {
        // Bookings are listed per customer email
        let email_index = IndexModel::builder().keys(doc! { "email": 1 }).build();

        self.db
            .collection::<Document>(BOOKINGS_COLLECTION)
            .create_index(email_index)
            .await?;

        log::info!("Database indexes created successfully");
        Ok(())
    }
}

#[derive(Clone)]
pub struct MongoRepository {
    db: Database,
    collection: Collection<Document>,
}

impl MongoRepository {
    pub fn new(db: Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection(collection_name),
            db,
        }
    }
}

#[async_trait]
impl DocumentRepository for MongoRepository {
    fn collection_name(&self) -> &str {
        self.collection.name()
    }

    async fn find_by_filter(&self, filter: Document) -> Result<Vec<Document>> {
        let mut cursor = self.collection.find(filter).await?;

        let mut documents = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            documents.push(document);
        }

        Ok(documents)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Document>> {
        let oid = parse_object_id(id)?;
        let document = self.collection.find_one(doc! { "_id": oid }).await?;
        Ok(document)
    }

    async fn insert(&self, document: Document) -> Result<InsertAck> {
        let result = self.collection.insert_one(document).await?;
        let inserted_id = result.inserted_id.as_object_id().ok_or_else(|| {
            BookingServerError::Internal(format!(
                "unexpected inserted id in '{}': {}",
                self.collection.name(),
                result.inserted_id
            ))
        })?;
        Ok(InsertAck::new(inserted_id))
    }

    async fn delete_by_id(&self, id: &str) -> Result<DeleteAck> {
        let oid = parse_object_id(id)?;
        let result = self.collection.delete_one(doc! { "_id": oid }).await?;
        Ok(DeleteAck::new(result.deleted_count))
    }

    async fn ping(&self) -> Result<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
