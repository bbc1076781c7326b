//! Observable collection facade.

use crate::entity::Keyed;
use crate::error::{StoreError, StoreResult};
use crate::key::EntityKey;
use crate::persist;
use crate::state::{Normalized, Selector};
use entstore_reactive::{Derived, Subscription, Writable};
use entstore_storage::KvStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// A normalized, observable collection of entities.
///
/// The store binds the canonical [`Normalized`] state to a single
/// [`Writable`] container. Every mutating operation resolves its targets,
/// computes a whole new state, and commits it with one container `set`,
/// which synchronously fans the snapshot out to every subscriber. A
/// mutation that changes nothing commits nothing; subscribers never see a
/// redundant snapshot from a no-op.
///
/// Read access goes through derived projections that recompute from the
/// latest snapshot on every notification.
///
/// One store instance assumes a single logical writer. Snapshots handed to
/// subscribers are clones; mutating them does not touch canonical state.
///
/// # Example
///
/// ```rust
/// use entstore_core::{EntityKey, EntityStore, Keyed};
///
/// #[derive(Clone)]
/// struct Track {
///     id: u32,
///     plays: u64,
/// }
///
/// impl Keyed for Track {
///     fn key(&self) -> EntityKey {
///         EntityKey::from(self.id)
///     }
/// }
///
/// let store = EntityStore::new();
/// store.set(Track { id: 1, plays: 0 });
/// store.update(|t| Track { plays: t.plays + 1, ..t.clone() }, 1);
///
/// assert_eq!(store.get(1).get().unwrap().plays, 1);
/// ```
pub struct EntityStore<T> {
    state: Writable<Normalized<T>>,
}

impl<T: Keyed + Clone + 'static> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Keyed + Clone + 'static> EntityStore<T> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_initial(Vec::new())
    }

    /// Creates a store holding the normalized form of `items`.
    #[must_use]
    pub fn with_initial(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            state: Writable::new(Normalized::from_items(items)),
        }
    }

    /// Returns a builder for configuring persistence.
    #[must_use]
    pub fn builder() -> EntityStoreBuilder<T> {
        EntityStoreBuilder::new()
    }

    /// Returns a clone of the current canonical state.
    #[must_use]
    pub fn snapshot(&self) -> Normalized<T> {
        self.state.get()
    }

    /// Subscribes to every committed snapshot.
    ///
    /// The callback runs once immediately with the current snapshot, then
    /// once per state-changing mutation. Mutating this store from inside
    /// the callback is undefined behavior.
    pub fn subscribe(
        &self,
        f: impl Fn(&Normalized<T>) + Send + Sync + 'static,
    ) -> Subscription<Normalized<T>> {
        self.state.subscribe(f)
    }

    // ------------------------------------------------------------------
    // Read projections
    // ------------------------------------------------------------------

    /// Projects every entity, in insertion order.
    #[must_use]
    pub fn all(&self) -> Derived<Normalized<T>, Vec<T>> {
        self.state
            .derive(|s| s.entities().into_iter().cloned().collect())
    }

    /// Projects a single entity by key.
    pub fn get(&self, key: impl Into<EntityKey>) -> Derived<Normalized<T>, Option<T>> {
        let key = key.into();
        self.state.derive(move |s| s.entity(&key).cloned())
    }

    /// Projects a single entity, addressed by an entity value's key.
    pub fn get_entity(&self, entity: &T) -> Derived<Normalized<T>, Option<T>> {
        self.get(entity.key())
    }

    /// Projects the entities found under `keys`, in input order.
    ///
    /// Unknown keys are dropped, so the projected list may be shorter than
    /// the key list.
    pub fn get_many<K: Into<EntityKey>>(
        &self,
        keys: impl IntoIterator<Item = K>,
    ) -> Derived<Normalized<T>, Vec<T>> {
        let keys: Vec<EntityKey> = keys.into_iter().map(Into::into).collect();
        self.state
            .derive(move |s| s.entities_by_keys(&keys).into_iter().cloned().collect())
    }

    /// Projects every entity matching the predicate, in collection order.
    pub fn get_where(
        &self,
        pred: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Derived<Normalized<T>, Vec<T>> {
        self.state
            .derive(move |s| s.entities_where(&pred).into_iter().cloned().collect())
    }

    /// Projects the active entity's key.
    #[must_use]
    pub fn active_id(&self) -> Derived<Normalized<T>, Option<EntityKey>> {
        self.state.derive(|s| s.active_id().cloned())
    }

    /// Projects the active entity.
    #[must_use]
    pub fn active(&self) -> Derived<Normalized<T>, Option<T>> {
        self.state.derive(|s| s.active().cloned())
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Inserts or replaces one entity.
    pub fn set(&self, entity: T) {
        self.set_many([entity]);
    }

    /// Inserts or replaces entities.
    ///
    /// Existing keys are replaced in place; new keys are appended. Empty
    /// input is a no-op with no notification.
    pub fn set_many(&self, entities: impl IntoIterator<Item = T>) {
        let items: Vec<T> = entities.into_iter().collect();
        self.commit(self.state.get().set_entities(items));
    }

    /// Removes the entities the selector resolves to.
    ///
    /// Accepts a key, a list of keys, an entity selector or a predicate;
    /// unknown targets are ignored. A selector resolving to nothing is a
    /// no-op with no notification.
    pub fn remove(&self, selector: impl Into<Selector<T>>) {
        self.commit(self.state.get().remove_entities(&selector.into()));
    }

    /// Removes every entity, clearing the store.
    pub fn reset(&self) {
        let current = self.state.get();
        if current.is_empty() {
            return;
        }
        self.state.set(Normalized::new());
    }

    /// Runs the entities the selector resolves to through `updater`.
    pub fn update(&self, updater: impl Fn(&T) -> T, selector: impl Into<Selector<T>>) {
        self.commit(
            self.state
                .get()
                .update_entities(updater, &selector.into()),
        );
    }

    /// Runs every entity through `updater`.
    pub fn update_all(&self, updater: impl Fn(&T) -> T) {
        self.commit(self.state.get().update_entities(updater, &Selector::All));
    }

    /// Moves the active pointer to `key`.
    ///
    /// Activating a non-member is a silent no-op, as is re-activating the
    /// current active key; neither notifies.
    pub fn set_active(&self, key: impl Into<EntityKey>) {
        self.commit(self.state.get().set_active(&key.into()));
    }

    /// Moves the active pointer to an entity value's key.
    pub fn set_active_entity(&self, entity: &T) {
        self.set_active(entity.key());
    }

    /// Commits a changed state; `None` means nothing changed and no
    /// snapshot is published.
    fn commit(&self, next: Option<Normalized<T>>) {
        if let Some(next) = next {
            self.state.set(next);
        }
    }
}

impl<T> std::fmt::Debug for EntityStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityStore")
            .field("subscribers", &self.state.subscriber_count())
            .finish_non_exhaustive()
    }
}

/// Builder for an [`EntityStore`].
///
/// Persistence is opt-in and explicit: requesting it with
/// [`persist`](Self::persist) names the storage key, and
/// [`storage`](Self::storage) injects the durable capability. Requesting
/// persistence without injecting a capability fails at
/// [`build`](Self::build) with [`StoreError::PersistenceUnavailable`].
pub struct EntityStoreBuilder<T> {
    initial: Vec<T>,
    storage_key: Option<String>,
    kv: Option<Arc<dyn KvStore>>,
}

impl<T> Default for EntityStoreBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EntityStoreBuilder<T> {
    /// Creates a builder with no initial items and no persistence.
    #[must_use]
    pub fn new() -> Self {
        Self {
            initial: Vec::new(),
            storage_key: None,
            kv: None,
        }
    }

    /// Sets the initial items used when no persisted snapshot exists.
    #[must_use]
    pub fn initial(mut self, items: impl IntoIterator<Item = T>) -> Self {
        self.initial = items.into_iter().collect();
        self
    }

    /// Requests persistence under `storage_key`.
    #[must_use]
    pub fn persist(mut self, storage_key: impl Into<String>) -> Self {
        self.storage_key = Some(storage_key.into());
        self
    }

    /// Injects the durable key-value capability.
    ///
    /// Inert unless [`persist`](Self::persist) is also called.
    #[must_use]
    pub fn storage(mut self, kv: Arc<dyn KvStore>) -> Self {
        self.kv = Some(kv);
        self
    }
}

impl<T> EntityStoreBuilder<T>
where
    T: Keyed + Clone + Serialize + DeserializeOwned + 'static,
{
    /// Builds the store.
    ///
    /// Without persistence this cannot fail. With persistence, the stored
    /// snapshot is hydrated (falling back to the initial items when absent
    /// or malformed) and a subscription re-persists every snapshot from
    /// then on, starting with the hydrated one.
    ///
    /// # Errors
    ///
    /// - [`StoreError::PersistenceUnavailable`] if persistence was
    ///   requested without a storage capability
    /// - [`StoreError::Storage`] if reading the persisted snapshot fails
    pub fn build(self) -> StoreResult<EntityStore<T>> {
        let Some(storage_key) = self.storage_key else {
            return Ok(EntityStore::with_initial(self.initial));
        };
        let kv = self.kv.ok_or(StoreError::PersistenceUnavailable)?;

        let (items, active_id) = persist::hydrate(kv.as_ref(), &storage_key, self.initial)?;
        let state = Normalized::from_items(items).with_active(active_id);

        let store = EntityStore {
            state: Writable::new(state),
        };
        persist::attach(&store.state, kv, storage_key);
        Ok(store)
    }
}
