//! # Entstore Storage
//!
//! Durable key-value capability for entstore.
//!
//! This crate provides the persistence boundary the entity store depends
//! on. Stores are **opaque string maps** - they hold whatever serialized
//! value the caller hands them under a caller-chosen key, and do not
//! interpret it.
//!
//! ## Design Principles
//!
//! - Two operations: `read` a key, `write` a key
//! - No knowledge of the entity store's snapshot format
//! - Must be `Send + Sync` so a subscription callback can write
//! - The entity store owns all value interpretation
//!
//! ## Available Stores
//!
//! - [`MemoryKv`] - For testing and ephemeral storage
//! - [`FileKv`] - For persistent storage, one file per key
//!
//! ## Example
//!
//! ```rust
//! use entstore_storage::{KvStore, MemoryKv};
//!
//! let kv = MemoryKv::new();
//! kv.write("session", "{\"byId\":{}}").unwrap();
//! assert_eq!(kv.read("session").unwrap().as_deref(), Some("{\"byId\":{}}"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod file;
mod memory;
mod store;

pub use error::{KvError, KvResult};
pub use file::FileKv;
pub use memory::MemoryKv;
pub use store::KvStore;
