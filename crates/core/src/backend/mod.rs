//! The store seam.
//!
//! [`DocumentStore`] is the narrow contract the core needs from a document
//! store: find-one, insert-one, update-one (field merge), delete-one, ping
//! and close, all addressed by collection name and record identifier. The
//! exact wire format is the backend's business.
//!
//! Two implementations ship: [`MongoStore`] over the async MongoDB driver,
//! and [`MemoryStore`], an in-process map used as a test stub/spy and for
//! offline use.

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use crate::record::Fields;
use crate::record_id::RecordId;
use async_trait::async_trait;

/// Failures raised below the store seam.
///
/// Carried as the `source` of the corresponding
/// [`StoreError`](crate::StoreError) variant, which adds the operation
/// context.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("store driver error: {0}")]
    Driver(#[from] mongodb::error::Error),
    #[error("store state is poisoned")]
    Poisoned,
}

/// Store capabilities the core depends on.
///
/// Single-document operations only; each call is one round trip and is
/// atomic at the store. `update_one` returns the matched count and
/// `delete_one` the deleted count, so the caller can distinguish "nothing
/// matched" from success without the backend raising.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Finds the unique document with the given identifier, if any.
    async fn find_one(
        &self,
        collection: &str,
        id: &RecordId,
    ) -> Result<Option<Fields>, BackendError>;

    /// Inserts one new document under the given identifier.
    async fn insert_one(
        &self,
        collection: &str,
        id: &RecordId,
        fields: &Fields,
    ) -> Result<(), BackendError>;

    /// Merges the listed fields into the matching document. Returns the
    /// number of documents matched (0 or 1 by identifier uniqueness).
    async fn update_one(
        &self,
        collection: &str,
        id: &RecordId,
        fields: &Fields,
    ) -> Result<u64, BackendError>;

    /// Removes the matching document. Returns the number of documents
    /// removed (0 or 1 by identifier uniqueness).
    async fn delete_one(&self, collection: &str, id: &RecordId) -> Result<u64, BackendError>;

    /// Verifies the store is reachable.
    async fn ping(&self) -> Result<(), BackendError>;

    /// Releases the backend's resources.
    async fn close(&self) -> Result<(), BackendError>;
}

// Shared handles delegate, so a backend can be held by a connection and
// observed elsewhere (the in-memory spy relies on this).
#[async_trait]
impl<T: DocumentStore + ?Sized> DocumentStore for std::sync::Arc<T> {
    async fn find_one(
        &self,
        collection: &str,
        id: &RecordId,
    ) -> Result<Option<Fields>, BackendError> {
        (**self).find_one(collection, id).await
    }

    async fn insert_one(
        &self,
        collection: &str,
        id: &RecordId,
        fields: &Fields,
    ) -> Result<(), BackendError> {
        (**self).insert_one(collection, id, fields).await
    }

    async fn update_one(
        &self,
        collection: &str,
        id: &RecordId,
        fields: &Fields,
    ) -> Result<u64, BackendError> {
        (**self).update_one(collection, id, fields).await
    }

    async fn delete_one(&self, collection: &str, id: &RecordId) -> Result<u64, BackendError> {
        (**self).delete_one(collection, id).await
    }

    async fn ping(&self) -> Result<(), BackendError> {
        (**self).ping().await
    }

    async fn close(&self) -> Result<(), BackendError> {
        (**self).close().await
    }
}
