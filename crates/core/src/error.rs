use crate::backend::BackendError;
use crate::record_id::RecordId;

/// Errors surfaced by [`StoreConnection`](crate::StoreConnection) operations.
///
/// Every variant carries enough context (operation, collection, identifier
/// where applicable) for a caller to render a precise message. "No matching
/// record" is deliberately *not* here: it is a normal outcome, reported
/// through the outcome enums rather than raised as an error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to open store connection to {endpoint}: {source}")]
    Open {
        endpoint: String,
        #[source]
        source: BackendError,
    },
    #[error("store at {endpoint} did not answer ping: {source}")]
    Ping {
        endpoint: String,
        #[source]
        source: BackendError,
    },
    #[error("connection is closed")]
    ConnectionClosed,
    #[error("failed to fetch record from '{collection}': {source}")]
    Fetch {
        collection: String,
        #[source]
        source: BackendError,
    },
    #[error("failed to insert new record into '{collection}': {source}")]
    Insert {
        collection: String,
        #[source]
        source: BackendError,
    },
    #[error("failed to update record {id} in '{collection}': {source}")]
    Update {
        collection: String,
        id: RecordId,
        #[source]
        source: BackendError,
    },
    #[error("failed to delete record {id} from '{collection}': {source}")]
    Delete {
        collection: String,
        id: RecordId,
        #[source]
        source: BackendError,
    },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
