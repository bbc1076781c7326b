//! # Entstore Core
//!
//! Normalized, observable entity collection.
//!
//! This crate provides:
//! - [`Normalized`] canonical state: entities keyed by id plus an ordered
//!   id list and an optional active pointer
//! - [`Selector`] resolution unifying key, key-list, entity, entity-list
//!   and predicate inputs
//! - Insert-or-replace, remove, update and set-active transitions, each
//!   committing at most one snapshot to the observable container
//! - The [`EntityStore`] facade with derived read projections
//! - A persistence adapter over any [`entstore_storage::KvStore`]
//!
//! ## Example
//!
//! ```rust
//! use entstore_core::{EntityKey, EntityStore, Keyed};
//!
//! #[derive(Clone)]
//! struct Todo {
//!     id: String,
//!     title: String,
//! }
//!
//! impl Keyed for Todo {
//!     fn key(&self) -> EntityKey {
//!         EntityKey::from(self.id.as_str())
//!     }
//! }
//!
//! let store = EntityStore::with_initial([
//!     Todo { id: "a".into(), title: "write docs".into() },
//!     Todo { id: "b".into(), title: "ship".into() },
//! ]);
//!
//! let titles = store.all();
//! assert_eq!(titles.get().len(), 2);
//!
//! store.remove("a");
//! assert_eq!(titles.get().len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod entity;
mod error;
mod key;
mod persist;
mod state;
mod store;

pub use entity::Keyed;
pub use error::{StoreError, StoreResult};
pub use key::EntityKey;
pub use state::{Normalized, Selector};
pub use store::{EntityStore, EntityStoreBuilder};

pub use entstore_reactive::{Derived, Subscription, Writable};
