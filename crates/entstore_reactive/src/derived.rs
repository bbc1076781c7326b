//! Derived read-only views.

use crate::subscription::Subscription;
use crate::writable::Writable;
use std::sync::Arc;

/// A read-only projection of a [`Writable`].
///
/// A derived view holds its source handle plus a mapping function. It owns
/// no state of its own: `get` recomputes from the source's current value,
/// and a subscriber re-runs the mapping on every source notification. There
/// is no caching and no change detection at this layer.
pub struct Derived<S, U> {
    source: Writable<S>,
    map: Arc<dyn Fn(&S) -> U + Send + Sync>,
}

impl<S, U> Clone for Derived<S, U> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            map: Arc::clone(&self.map),
        }
    }
}

impl<S: Clone, U> Derived<S, U> {
    pub(crate) fn new(source: Writable<S>, map: impl Fn(&S) -> U + Send + Sync + 'static) -> Self {
        Self {
            source,
            map: Arc::new(map),
        }
    }

    /// Computes the projected value from the source's current value.
    pub fn get(&self) -> U {
        self.source.with_value(|s| (self.map)(s))
    }

    /// Subscribes to the projected value.
    ///
    /// The callback runs once immediately, then after every source commit.
    pub fn subscribe(&self, f: impl Fn(&U) + Send + Sync + 'static) -> Subscription<S>
    where
        S: 'static,
        U: 'static,
    {
        let map = Arc::clone(&self.map);
        self.source.subscribe(move |s| f(&map(s)))
    }
}
