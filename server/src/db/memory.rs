use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use mongodb::bson::{oid::ObjectId, Document};

use super::models::{matches_filter, parse_object_id, DeleteAck, InsertAck};
use super::repository::DocumentRepository;
use crate::error::Result;

/// Process-local collection for tests and database-less runs.
#[derive(Clone)]
pub struct MemoryRepository {
    name: String,
    documents: Arc<DashMap<ObjectId, Document>>,
}

impl MemoryRepository {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: Arc::new(DashMap::new()),
        }
    }

    /// Inserts with a store-assigned id, like `insert`, without going through async.
    pub fn seed(&self, mut document: Document) -> ObjectId {
        let oid = ObjectId::new();
        document.insert("_id", oid);
        self.documents.insert(oid, document);
        oid
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl DocumentRepository for MemoryRepository {
    fn collection_name(&self) -> &str {
        &self.name
    }

    async fn find_by_filter(&self, filter: Document) -> Result<Vec<Document>> {
        let mut documents: Vec<(ObjectId, Document)> = self
            .documents
            .iter()
            .filter(|entry| matches_filter(entry.value(), &filter))
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();

        // ObjectIds from one process sort in creation order
        documents.sort_by_key(|(oid, _)| *oid);

        Ok(documents.into_iter().map(|(_, document)| document).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Document>> {
        let oid = parse_object_id(id)?;
        Ok(self.documents.get(&oid).map(|entry| entry.value().clone()))
    }

    async fn insert(&self, document: Document) -> Result<InsertAck> {
        Ok(InsertAck::new(self.seed(document)))
    }

    async fn delete_by_id(&self, id: &str) -> Result<DeleteAck> {
        let oid = parse_object_id(id)?;
        let deleted = self.documents.remove(&oid).map_or(0, |_| 1);
        Ok(DeleteAck::new(deleted))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
