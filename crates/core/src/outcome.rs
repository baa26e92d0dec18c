//! Structured operation outcomes.
//!
//! "Nothing matched" and "the caller typed a bad identifier" are normal,
//! expected results of a CRUD call, not faults. They are modelled here as
//! enum variants so callers branch on data instead of catching errors;
//! store-level failures stay in [`StoreError`](crate::StoreError).

use crate::record::Record;
use crate::record_id::RecordId;

/// Result of a fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The unique record with the requested identifier.
    Found(Record),
    /// A well-formed identifier matched no record.
    NotFound { collection: String, id: RecordId },
    /// The supplied string did not decode as an identifier. No store call
    /// was made; the input is user-correctable.
    InvalidIdentifier { input: String, reason: String },
}

/// Result of an update.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// Exactly one record had the listed fields merged in.
    Updated { collection: String, id: RecordId },
    /// A well-formed identifier matched no record; nothing was written.
    NotFound { collection: String, id: RecordId },
    /// The supplied string did not decode as an identifier. No store call
    /// was made.
    InvalidIdentifier { input: String, reason: String },
}

/// Result of a delete.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    /// Exactly one record was removed.
    Deleted { collection: String, id: RecordId },
    /// A well-formed identifier matched no record; nothing was removed.
    NotFound { collection: String, id: RecordId },
    /// The supplied string did not decode as an identifier. No store call
    /// was made.
    InvalidIdentifier { input: String, reason: String },
}
