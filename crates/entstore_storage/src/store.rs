//! Durable key-value store trait definition.

use crate::error::KvResult;

/// A durable key-value store.
///
/// Stores are **opaque string maps**. They provide exactly two operations -
/// reading the value stored under a key, and replacing it. The entity store
/// owns all value interpretation; stores do not understand the snapshot
/// format they hold.
///
/// # Invariants
///
/// - `read` returns exactly the value most recently written under that key,
///   or `None` if the key was never written
/// - `write` replaces any previous value atomically with respect to `read`
/// - Stores must be `Send + Sync`; a persistence subscription writes from
///   whatever context the owning store commits on
///
/// # Implementors
///
/// - [`crate::MemoryKv`] - For testing
/// - [`crate::FileKv`] - For persistent storage
pub trait KvStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// Returns `None` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid for this store or an I/O
    /// error occurs.
    fn read(&self, key: &str) -> KvResult<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid for this store or an I/O
    /// error occurs.
    fn write(&self, key: &str, value: &str) -> KvResult<()>;
}
