//! Store connection configuration.
//!
//! Configuration is resolved once at process startup and then passed into
//! [`StoreConnection::open`](crate::StoreConnection::open). The intent is to
//! avoid reading process-wide environment variables during operation
//! handling, which can lead to inconsistent behaviour in multi-threaded
//! runtimes and test harnesses: the env helpers here take plain
//! `Option<String>` values so callers (and tests) stay in control of where
//! those values come from.

use crate::error::{StoreError, StoreResult};

/// Endpoint used when no URI is configured.
pub const DEFAULT_ENDPOINT: &str = "mongodb://localhost:27017/";

/// Database used when no database name is configured.
pub const DEFAULT_DATABASE: &str = "Bentego";

/// Store configuration resolved at startup.
///
/// Validated on construction: once you hold a `StoreConfig`, the endpoint is
/// a syntactically plausible store address and the database name is
/// non-empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    endpoint: String,
    database: String,
}

impl StoreConfig {
    /// Create a new `StoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidInput`] if `endpoint` does not carry a
    /// `mongodb://` or `mongodb+srv://` scheme, or if `database` is empty or
    /// whitespace-only.
    pub fn new(endpoint: impl Into<String>, database: impl Into<String>) -> StoreResult<Self> {
        let endpoint = endpoint.into();
        let database = database.into();

        if !endpoint.starts_with("mongodb://") && !endpoint.starts_with("mongodb+srv://") {
            return Err(StoreError::InvalidInput(format!(
                "endpoint must use the mongodb:// or mongodb+srv:// scheme, got: '{endpoint}'"
            )));
        }
        if database.trim().is_empty() {
            return Err(StoreError::InvalidInput(
                "database name cannot be empty".into(),
            ));
        }

        Ok(Self { endpoint, database })
    }

    /// Resolve a config from optional environment values.
    ///
    /// Empty or whitespace-only values are treated as absent; absent values
    /// fall back to [`DEFAULT_ENDPOINT`] and [`DEFAULT_DATABASE`].
    pub fn from_env_values(
        endpoint: Option<String>,
        database: Option<String>,
    ) -> StoreResult<Self> {
        let endpoint = non_blank(endpoint).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let database = non_blank(database).unwrap_or_else(|| DEFAULT_DATABASE.to_string());
        Self::new(endpoint, database)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn database(&self) -> &str {
        &self.database
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_mongodb_scheme() {
        let cfg = StoreConfig::new("mongodb://localhost:27017/", "Bentego")
            .expect("config should be accepted");
        assert_eq!(cfg.endpoint(), "mongodb://localhost:27017/");
        assert_eq!(cfg.database(), "Bentego");
    }

    #[test]
    fn test_new_accepts_srv_scheme() {
        let cfg = StoreConfig::new("mongodb+srv://cluster.example.net/", "Bentego")
            .expect("config should be accepted");
        assert_eq!(cfg.endpoint(), "mongodb+srv://cluster.example.net/");
    }

    #[test]
    fn test_new_rejects_unknown_scheme() {
        let err = StoreConfig::new("http://localhost:27017/", "Bentego")
            .expect_err("http scheme should be rejected");
        assert!(matches!(err, StoreError::InvalidInput(_)));
    }

    #[test]
    fn test_new_rejects_empty_database() {
        let err = StoreConfig::new("mongodb://localhost:27017/", "  ")
            .expect_err("blank database should be rejected");
        assert!(matches!(err, StoreError::InvalidInput(_)));
    }

    #[test]
    fn test_from_env_values_applies_defaults() {
        let cfg = StoreConfig::from_env_values(None, None).expect("defaults should be valid");
        assert_eq!(cfg.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(cfg.database(), DEFAULT_DATABASE);
    }

    #[test]
    fn test_from_env_values_treats_blank_as_absent() {
        let cfg = StoreConfig::from_env_values(Some("   ".into()), Some(String::new()))
            .expect("blank values should fall back to defaults");
        assert_eq!(cfg.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(cfg.database(), DEFAULT_DATABASE);
    }

    #[test]
    fn test_from_env_values_uses_provided_values() {
        let cfg = StoreConfig::from_env_values(
            Some("mongodb://db.internal:27017/".into()),
            Some("Cardiology".into()),
        )
        .expect("provided values should be used");
        assert_eq!(cfg.endpoint(), "mongodb://db.internal:27017/");
        assert_eq!(cfg.database(), "Cardiology");
    }
}
