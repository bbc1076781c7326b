//! Error types for entstore core.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur when constructing an entity store.
///
/// Running stores do not fail: unknown keys in selectors and activation of
/// non-members are silent no-ops, and a malformed persisted snapshot is
/// recovered by falling back to the caller-supplied initial items. Only
/// construction can surface an error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Persistence was requested but no durable key-value capability was
    /// injected.
    #[error("persistence requested without a durable key-value capability")]
    PersistenceUnavailable,

    /// The durable store failed while reading the persisted snapshot.
    #[error("storage error: {0}")]
    Storage(#[from] entstore_storage::KvError),
}
