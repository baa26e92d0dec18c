//! The store connection.
//!
//! [`StoreConnection`] is the single component callers talk to. It owns a
//! backend handle, validates identifiers *before* any store call, performs
//! one round trip per operation, and normalises every result into either a
//! structured outcome or a [`StoreError`].
//!
//! ## Lifecycle
//!
//! A connection only exists once [`StoreConnection::open`] has succeeded
//! (the "unopened" state is unrepresentable), and stays usable until
//! [`StoreConnection::close`]. Close is terminal: every CRUD call on a
//! closed connection fails with [`StoreError::ConnectionClosed`], and a
//! second close is a no-op. The handle holds no cached record state;
//! every operation round-trips to the store.
//!
//! Calls are issued one at a time and awaited to completion; callers
//! wanting timeouts or cancellation wrap the futures externally.

use crate::backend::{DocumentStore, MongoStore};
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::outcome::{DeleteOutcome, FetchOutcome, UpdateOutcome};
use crate::record::{Fields, Record};
use crate::record_id::{IdentifierError, RecordId};

/// A live connection to one database in a document store.
pub struct StoreConnection {
    backend: Box<dyn DocumentStore>,
    database: String,
    closed: bool,
}

impl StoreConnection {
    /// Opens a connection to the configured endpoint and database.
    ///
    /// The store is pinged before this returns, so an unreachable or
    /// malformed endpoint fails here rather than on the first CRUD call.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`] if the endpoint cannot be connected to,
    /// or [`StoreError::Ping`] if the store does not respond. These
    /// propagate to the caller; connection failures are never converted
    /// into outcomes.
    pub async fn open(config: &StoreConfig) -> StoreResult<Self> {
        let store = MongoStore::connect(config)
            .await
            .map_err(|source| StoreError::Open {
                endpoint: config.endpoint().to_string(),
                source,
            })?;
        store.ping().await.map_err(|source| StoreError::Ping {
            endpoint: config.endpoint().to_string(),
            source,
        })?;

        tracing::info!(
            endpoint = config.endpoint(),
            database = config.database(),
            "store connection opened"
        );
        Ok(Self::with_backend(Box::new(store), config.database()))
    }

    /// Wraps an already-constructed backend.
    ///
    /// This is the seam for alternative backends, such as
    /// [`MemoryStore`](crate::MemoryStore) in tests or offline use.
    pub fn with_backend(backend: Box<dyn DocumentStore>, database: impl Into<String>) -> Self {
        Self {
            backend,
            database: database.into(),
            closed: false,
        }
    }

    /// The database this connection is scoped to.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Fetches the unique record with the given identifier.
    ///
    /// Pure read. The identifier is decoded locally first; a malformed
    /// string returns [`FetchOutcome::InvalidIdentifier`] without touching
    /// the store.
    ///
    /// # Errors
    ///
    /// [`StoreError::ConnectionClosed`] on a closed connection,
    /// [`StoreError::InvalidInput`] for an empty collection name, or
    /// [`StoreError::Fetch`] if the store fails the read.
    pub async fn fetch(&self, collection: &str, identifier: &str) -> StoreResult<FetchOutcome> {
        self.ensure_open()?;
        let collection = validate_collection(collection)?;

        let id = match RecordId::parse(identifier) {
            Ok(id) => id,
            Err(err) => return Ok(invalid_identifier(err, FetchOutcome::invalid)),
        };

        tracing::debug!(collection, %id, "fetching record");
        match self.backend.find_one(collection, &id).await {
            Ok(Some(fields)) => Ok(FetchOutcome::Found(Record { id, fields })),
            Ok(None) => Ok(FetchOutcome::NotFound {
                collection: collection.to_string(),
                id,
            }),
            Err(source) => Err(StoreError::Fetch {
                collection: collection.to_string(),
                source,
            }),
        }
    }

    /// Inserts a new record and returns its freshly generated identifier.
    ///
    /// The identifier is always generated here; a caller-supplied `_id`
    /// attribute is discarded (and logged) rather than honoured. Exactly
    /// one record is created on success: a single-document write is atomic
    /// at the store, so no partial-insert state is possible.
    ///
    /// # Errors
    ///
    /// [`StoreError::ConnectionClosed`], [`StoreError::InvalidInput`], or
    /// [`StoreError::Insert`] if the store rejects the write. The write is
    /// never retried.
    pub async fn insert(&self, collection: &str, mut attributes: Fields) -> StoreResult<RecordId> {
        self.ensure_open()?;
        let collection = validate_collection(collection)?;

        if attributes.remove("_id").is_some() {
            tracing::warn!(collection, "discarding caller-supplied _id attribute");
        }

        let id = RecordId::generate();
        tracing::debug!(collection, %id, "inserting record");
        self.backend
            .insert_one(collection, &id, &attributes)
            .await
            .map_err(|source| StoreError::Insert {
                collection: collection.to_string(),
                source,
            })?;
        Ok(id)
    }

    /// Merges the listed fields into the matching record.
    ///
    /// Field-level merge: fields present in `attributes` are overwritten,
    /// fields absent are left unchanged, and no field is ever removed. Zero
    /// matches is [`UpdateOutcome::NotFound`], not an error.
    ///
    /// # Errors
    ///
    /// [`StoreError::ConnectionClosed`], [`StoreError::InvalidInput`] for an
    /// empty collection name or an empty attribute map, or
    /// [`StoreError::Update`] on a store-level failure.
    pub async fn update(
        &self,
        collection: &str,
        identifier: &str,
        attributes: Fields,
    ) -> StoreResult<UpdateOutcome> {
        self.ensure_open()?;
        let collection = validate_collection(collection)?;
        if attributes.is_empty() {
            return Err(StoreError::InvalidInput("no fields to update".into()));
        }

        let id = match RecordId::parse(identifier) {
            Ok(id) => id,
            Err(err) => return Ok(invalid_identifier(err, UpdateOutcome::invalid)),
        };

        tracing::debug!(collection, %id, "updating record");
        let matched = self
            .backend
            .update_one(collection, &id, &attributes)
            .await
            .map_err(|source| StoreError::Update {
                collection: collection.to_string(),
                id,
                source,
            })?;

        if matched > 0 {
            Ok(UpdateOutcome::Updated {
                collection: collection.to_string(),
                id,
            })
        } else {
            Ok(UpdateOutcome::NotFound {
                collection: collection.to_string(),
                id,
            })
        }
    }

    /// Permanently removes the matching record.
    ///
    /// Zero removals is [`DeleteOutcome::NotFound`], not an error. More
    /// than one removal cannot occur given identifier uniqueness.
    ///
    /// # Errors
    ///
    /// [`StoreError::ConnectionClosed`], [`StoreError::InvalidInput`], or
    /// [`StoreError::Delete`] on a store-level failure.
    pub async fn delete(&self, collection: &str, identifier: &str) -> StoreResult<DeleteOutcome> {
        self.ensure_open()?;
        let collection = validate_collection(collection)?;

        let id = match RecordId::parse(identifier) {
            Ok(id) => id,
            Err(err) => return Ok(invalid_identifier(err, DeleteOutcome::invalid)),
        };

        tracing::debug!(collection, %id, "deleting record");
        let deleted = self
            .backend
            .delete_one(collection, &id)
            .await
            .map_err(|source| StoreError::Delete {
                collection: collection.to_string(),
                id,
                source,
            })?;

        if deleted > 0 {
            Ok(DeleteOutcome::Deleted {
                collection: collection.to_string(),
                id,
            })
        } else {
            Ok(DeleteOutcome::NotFound {
                collection: collection.to_string(),
                id,
            })
        }
    }

    /// Closes the connection.
    ///
    /// Idempotent: closing an already-closed connection is a no-op. A
    /// backend teardown failure is logged, not surfaced; close's contract
    /// is release, and after it returns all other operations fail with
    /// [`StoreError::ConnectionClosed`] until a fresh [`open`](Self::open).
    pub async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if let Err(err) = self.backend.close().await {
            tracing::warn!(database = %self.database, "store teardown failed: {err}");
        } else {
            tracing::info!(database = %self.database, "store connection closed");
        }
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.closed {
            return Err(StoreError::ConnectionClosed);
        }
        Ok(())
    }
}

fn validate_collection(name: &str) -> StoreResult<&str> {
    if name.trim().is_empty() {
        return Err(StoreError::InvalidInput(
            "collection name cannot be empty".into(),
        ));
    }
    Ok(name)
}

fn invalid_identifier<T>(err: IdentifierError, make: fn(String, String) -> T) -> T {
    make(err.input.clone(), err.to_string())
}

impl FetchOutcome {
    fn invalid(input: String, reason: String) -> Self {
        FetchOutcome::InvalidIdentifier { input, reason }
    }
}

impl UpdateOutcome {
    fn invalid(input: String, reason: String) -> Self {
        UpdateOutcome::InvalidIdentifier { input, reason }
    }
}

impl DeleteOutcome {
    fn invalid(input: String, reason: String) -> Self {
        DeleteOutcome::InvalidIdentifier { input, reason }
    }
}
