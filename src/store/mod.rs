pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::query::fragment::Predicate;

/// A schema-less document as stored: arbitrary keys, generic JSON values.
pub type Document = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store configuration missing: {0}")]
    ConfigMissing(&'static str),

    #[error("invalid collection name: {0}")]
    InvalidCollection(String),

    #[error("invalid sort field: {0}")]
    InvalidSortField(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Narrow query interface to the document store. One independent query per
/// call; pooling is the implementation's concern.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Find all documents in `collection` matching `predicate`, optionally
    /// sorted by a field name (`-` prefix for descending).
    async fn find(
        &self,
        collection: &str,
        predicate: &Predicate,
        sort: Option<&str>,
    ) -> Result<Vec<Document>, StoreError>;

    /// Liveness probe for health reporting.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Collection and sort-field names get interpolated into queries, so they
/// must be plain identifiers.
pub(crate) fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub(crate) fn validate_collection_name(name: &str) -> Result<(), StoreError> {
    if is_valid_identifier(name) {
        Ok(())
    } else {
        Err(StoreError::InvalidCollection(name.to_string()))
    }
}

/// Split a sort spec into (field, descending).
pub(crate) fn parse_sort(sort: &str) -> Result<(&str, bool), StoreError> {
    let (field, descending) = match sort.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (sort, false),
    };
    if is_valid_identifier(field) {
        Ok((field, descending))
    } else {
        Err(StoreError::InvalidSortField(sort.to_string()))
    }
}
