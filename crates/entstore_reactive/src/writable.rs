//! Writable observable value cell.

use crate::derived::Derived;
use crate::subscription::Subscription;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub(crate) type Callback<S> = Arc<dyn Fn(&S) + Send + Sync>;

/// Shared interior of a [`Writable`], behind an `Arc` so that handles,
/// derived views and subscriptions can all point at the same cell.
pub(crate) struct Cell<S> {
    /// Current value.
    value: RwLock<S>,
    /// Observer list, keyed by subscriber id. Ids are handed out
    /// monotonically, so iteration order is subscription order.
    subscribers: RwLock<BTreeMap<u64, Callback<S>>>,
    /// Next subscriber id.
    next_id: AtomicU64,
}

impl<S> Cell<S> {
    pub(crate) fn remove_subscriber(&self, id: u64) {
        self.subscribers.write().remove(&id);
    }
}

/// A mutable observable container.
///
/// `Writable<S>` holds a single value and an observer list. Setting a new
/// value synchronously invokes every current subscriber with the new value,
/// in subscription order, before `set` returns.
///
/// Handles are cheap to clone; every clone points at the same cell.
///
/// # Re-entrancy
///
/// The cell's locks are released before subscribers run, so a subscriber
/// that calls `set` again will not deadlock. The snapshot ordering observed
/// by other subscribers in that case is unspecified; callers that need a
/// total order must not write from inside a callback.
pub struct Writable<S> {
    cell: Arc<Cell<S>>,
}

impl<S> Clone for Writable<S> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<S: Clone> Writable<S> {
    /// Creates a new writable cell holding `initial`.
    pub fn new(initial: S) -> Self {
        Self {
            cell: Arc::new(Cell {
                value: RwLock::new(initial),
                subscribers: RwLock::new(BTreeMap::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Returns a clone of the current value.
    pub fn get(&self) -> S {
        self.cell.value.read().clone()
    }

    /// Borrows the current value without cloning it.
    pub(crate) fn with_value<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.cell.value.read())
    }

    /// Replaces the value and notifies every subscriber.
    pub fn set(&self, value: S) {
        *self.cell.value.write() = value.clone();
        self.fan_out(&value);
    }

    /// Computes a new value from the current one, then commits it via
    /// [`set`](Self::set). The closure runs outside the write lock.
    pub fn update(&self, f: impl FnOnce(&S) -> S) {
        let next = {
            let current = self.cell.value.read();
            f(&current)
        };
        self.set(next);
    }

    /// Registers a callback and returns a handle that can unsubscribe it.
    ///
    /// The callback is invoked once immediately with the current value,
    /// then again on every subsequent `set`.
    pub fn subscribe(&self, f: impl Fn(&S) + Send + Sync + 'static) -> Subscription<S> {
        let id = self.cell.next_id.fetch_add(1, Ordering::Relaxed);
        let callback: Callback<S> = Arc::new(f);
        self.cell.subscribers.write().insert(id, Arc::clone(&callback));

        let current = self.get();
        callback(&current);

        Subscription::new(id, Arc::downgrade(&self.cell))
    }

    /// Creates a derived read-only view over this cell.
    pub fn derive<U>(&self, map: impl Fn(&S) -> U + Send + Sync + 'static) -> Derived<S, U> {
        Derived::new(self.clone(), map)
    }

    /// Invokes every subscriber with `value`, in subscription order.
    ///
    /// Callbacks are cloned out of the observer list first so that no lock
    /// is held while user code runs.
    fn fan_out(&self, value: &S) {
        let callbacks: Vec<Callback<S>> = self.cell.subscribers.read().values().cloned().collect();
        for callback in callbacks {
            callback(value);
        }
    }
}

impl<S> Writable<S> {
    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.cell.subscribers.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn get_returns_current_value() {
        let cell = Writable::new(7);
        assert_eq!(cell.get(), 7);

        cell.set(8);
        assert_eq!(cell.get(), 8);
    }

    #[test]
    fn subscribe_receives_current_value_immediately() {
        let cell = Writable::new("initial".to_string());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = Arc::clone(&seen);
        let _sub = cell.subscribe(move |v: &String| seen_clone.lock().push(v.clone()));

        assert_eq!(*seen.lock(), vec!["initial".to_string()]);
    }

    #[test]
    fn set_fans_out_to_all_subscribers() {
        let cell = Writable::new(0);
        let a = Arc::new(Mutex::new(Vec::new()));
        let b = Arc::new(Mutex::new(Vec::new()));

        let a_clone = Arc::clone(&a);
        let _sub_a = cell.subscribe(move |v| a_clone.lock().push(*v));
        let b_clone = Arc::clone(&b);
        let _sub_b = cell.subscribe(move |v| b_clone.lock().push(*v));

        cell.set(1);
        cell.set(2);

        assert_eq!(*a.lock(), vec![0, 1, 2]);
        assert_eq!(*b.lock(), vec![0, 1, 2]);
    }

    #[test]
    fn delivery_is_in_subscription_order() {
        let cell = Writable::new(0);
        let order = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&order);
        let _sub_a = cell.subscribe(move |_| first.lock().push("first"));
        let second = Arc::clone(&order);
        let _sub_b = cell.subscribe(move |_| second.lock().push("second"));

        order.lock().clear();
        cell.set(1);

        assert_eq!(*order.lock(), vec!["first", "second"]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let cell = Writable::new(0);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = Arc::clone(&seen);
        let sub = cell.subscribe(move |v| seen_clone.lock().push(*v));
        assert_eq!(cell.subscriber_count(), 1);

        sub.unsubscribe();
        assert_eq!(cell.subscriber_count(), 0);

        cell.set(1);
        assert_eq!(*seen.lock(), vec![0]);
    }

    #[test]
    fn dropping_the_handle_keeps_the_subscription() {
        let cell = Writable::new(0);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = Arc::clone(&seen);
        drop(cell.subscribe(move |v| seen_clone.lock().push(*v)));

        cell.set(1);
        assert_eq!(*seen.lock(), vec![0, 1]);
    }

    #[test]
    fn update_computes_from_current_value() {
        let cell = Writable::new(10);
        cell.update(|n| n + 5);
        assert_eq!(cell.get(), 15);
    }

    #[test]
    fn clones_share_the_same_cell() {
        let cell = Writable::new(1);
        let handle = cell.clone();

        handle.set(2);
        assert_eq!(cell.get(), 2);
    }
}
