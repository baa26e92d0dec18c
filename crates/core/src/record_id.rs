//! Record identifiers.
//!
//! Every record in the store is addressed by a 12-byte object identifier,
//! conventionally rendered as **24 lowercase hexadecimal characters**. The
//! identifier is assigned by the core on insert, is globally unique within a
//! collection, and is immutable once assigned.
//!
//! This module provides a small wrapper type ([`RecordId`]) that *guarantees*
//! the canonical rendering once constructed.
//!
//! ## Canonical identifier form
//! - Length: 24
//! - Characters: `0-9` and `a-f` only
//! - Example: `65f1a2b3c4d5e6f708192a3b`
//!
//! Notes:
//! - Canonical form is *required* for externally supplied identifiers (for
//!   example, from CLI/API inputs). Use [`RecordId::parse`] to validate an
//!   input string.
//! - Non-canonical values (uppercase, wrong length, non-hex) are rejected;
//!   no normalisation is attempted.

use mongodb::bson::oid::ObjectId;
use std::{fmt, str::FromStr};

/// Error returned when an identifier string is not in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("identifier must be 24 lowercase hex characters, got: '{input}'")]
pub struct IdentifierError {
    /// The rejected input, echoed back for caller-facing messages.
    pub input: String,
}

/// The canonical record identifier (12 bytes, 24 lowercase hex characters).
///
/// This wrapper guarantees that once constructed, the contained identifier
/// is in canonical form. It provides type safety for identifier handling and
/// a consistent rendering everywhere one is displayed.
///
/// # When to use this type
/// Use this wrapper whenever you are:
/// - Accepting an identifier string from *outside* the core (CLI input, API
///   request, etc), or
/// - Generating a fresh identifier for a new record.
///
/// # Construction
/// - [`RecordId::generate`] allocates a new, collision-free identifier (for
///   inserts).
/// - [`RecordId::parse`] validates an externally supplied identifier.
///
/// # Display format
/// When displayed or converted to string, `RecordId` always produces the
/// canonical 24-character lowercase hex form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RecordId(ObjectId);

impl RecordId {
    /// Generates a fresh identifier for a new record.
    ///
    /// Generated identifiers are collision-free by construction (timestamp,
    /// per-process random value and counter), so two successful inserts can
    /// never share one.
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    /// Validates and parses an identifier string that must already be in
    /// canonical form.
    ///
    /// This does **not** normalise other renderings (for example, uppercase
    /// hex). Callers must provide the canonical representation.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError`] if `input` is not 24 lowercase hex
    /// characters. No store call is made on this path.
    pub fn parse(input: &str) -> Result<Self, IdentifierError> {
        if Self::is_canonical(input) {
            // is_canonical guarantees 24 valid hex digits, so parse_str succeeds
            let oid = ObjectId::parse_str(input).expect("is_canonical guarantees a valid ObjectId");
            return Ok(Self(oid));
        }
        Err(IdentifierError {
            input: input.to_string(),
        })
    }

    /// Returns true if `input` is in canonical identifier form.
    ///
    /// Purely syntactic: exactly 24 bytes, lowercase hex only. Fast enough
    /// to use as a pre-check before [`parse`](Self::parse).
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 24
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    /// Returns the underlying BSON object identifier.
    ///
    /// This is what crosses the wire to the store as the `_id` field.
    pub(crate) fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl FromStr for RecordId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordId::parse(s)
    }
}

impl serde::Serialize for RecordId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RecordId::parse(&s).map_err(serde::de::Error::custom)
    }
}
