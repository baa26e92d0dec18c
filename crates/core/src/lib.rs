//! # Bentego Core
//!
//! Core data-access logic for the Bentego clinical record store.
//!
//! This crate is a thin, strict layer between callers and a document store:
//! - Generic CRUD over schema-less records ([`StoreConnection`])
//! - Canonical record identifiers ([`RecordId`]) validated before any store
//!   call
//! - Structured outcomes ([`FetchOutcome`], [`UpdateOutcome`],
//!   [`DeleteOutcome`]) separating "no match" from failure
//! - A narrow store seam ([`DocumentStore`]) with MongoDB and in-memory
//!   backends
//!
//! **No presentation concerns**: forms, widgets and rendering belong to the
//! caller. This crate receives collection names, identifier strings and
//! attribute mappings, and hands back records, outcomes or errors.

pub mod backend;
pub mod config;
pub mod connection;
pub mod error;
pub mod outcome;
pub mod record;
pub mod record_id;

pub use backend::{BackendError, DocumentStore, MemoryStore, MongoStore};
pub use config::{StoreConfig, DEFAULT_DATABASE, DEFAULT_ENDPOINT};
pub use connection::StoreConnection;
pub use error::{StoreError, StoreResult};
pub use outcome::{DeleteOutcome, FetchOutcome, UpdateOutcome};
pub use record::{FieldValue, Fields, Record};
pub use record_id::{IdentifierError, RecordId};
