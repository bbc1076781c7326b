//! # Entstore Reactive
//!
//! Mutable observable container primitive for entstore.
//!
//! This crate provides the lowest-level reactive abstraction the entity
//! store is built on. A [`Writable`] is a single value cell with an
//! observer list attached:
//!
//! - `get` returns the current value
//! - `set` replaces the value and synchronously fans out to every subscriber
//! - `subscribe` registers a callback and returns a [`Subscription`] handle
//!
//! Delivery is synchronous and in subscription order. There is no batching,
//! no deferred delivery, and no cross-thread coordination beyond the locks
//! guarding the cell and the observer list.
//!
//! [`Derived`] layers read-only projections on top: a derived view holds a
//! mapping function and recomputes from the latest source value on every
//! notification.
//!
//! ## Example
//!
//! ```rust
//! use entstore_reactive::Writable;
//!
//! let counter = Writable::new(0u32);
//! let doubled = counter.derive(|n| n * 2);
//!
//! counter.set(21);
//! assert_eq!(doubled.get(), 42);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod derived;
mod subscription;
mod writable;

pub use derived::Derived;
pub use subscription::Subscription;
pub use writable::Writable;
