//! MongoDB-backed document store.

use crate::backend::{BackendError, DocumentStore};
use crate::config::StoreConfig;
use crate::record::{document_to_fields, fields_to_document, Fields};
use crate::record_id::RecordId;
use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::{Client, Collection, Database};

/// A live handle to a MongoDB database.
///
/// Cheap to clone (the driver shares one connection pool across clones).
/// Collections are addressed purely by name on every call; no collection
/// metadata is created, validated or cached here.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    database: Database,
}

impl MongoStore {
    /// Connects to the store at the configured endpoint, scoped to the
    /// configured database.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Driver`] if the endpoint is malformed. Note
    /// that the driver connects lazily, so an unreachable store may only
    /// surface on the first operation; [`StoreConnection::open`] follows
    /// this call with a ping to force the issue at open time.
    ///
    /// [`StoreConnection::open`]: crate::StoreConnection::open
    pub async fn connect(config: &StoreConfig) -> Result<Self, BackendError> {
        let client = Client::with_uri_str(config.endpoint()).await?;
        let database = client.database(config.database());
        Ok(Self { client, database })
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection::<Document>(name)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find_one(
        &self,
        collection: &str,
        id: &RecordId,
    ) -> Result<Option<Fields>, BackendError> {
        let found = self
            .collection(collection)
            .find_one(doc! { "_id": id.object_id() })
            .await?;
        Ok(found.map(document_to_fields))
    }

    async fn insert_one(
        &self,
        collection: &str,
        id: &RecordId,
        fields: &Fields,
    ) -> Result<(), BackendError> {
        let mut document = fields_to_document(fields);
        document.insert("_id", id.object_id());
        self.collection(collection).insert_one(document).await?;
        Ok(())
    }

    async fn update_one(
        &self,
        collection: &str,
        id: &RecordId,
        fields: &Fields,
    ) -> Result<u64, BackendError> {
        let result = self
            .collection(collection)
            .update_one(
                doc! { "_id": id.object_id() },
                doc! { "$set": fields_to_document(fields) },
            )
            .await?;
        Ok(result.matched_count)
    }

    async fn delete_one(&self, collection: &str, id: &RecordId) -> Result<u64, BackendError> {
        let result = self
            .collection(collection)
            .delete_one(doc! { "_id": id.object_id() })
            .await?;
        Ok(result.deleted_count)
    }

    async fn ping(&self) -> Result<(), BackendError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), BackendError> {
        // shutdown() consumes a handle; the pool is shared across clones,
        // so shutting down a clone tears down the real connection.
        self.client.clone().shutdown().await;
        Ok(())
    }
}
