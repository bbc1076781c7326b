//! Canonical collection state.
//!
//! [`Normalized`] is the `{byId, allIds, activeId}` triple the whole store
//! revolves around. It upholds three invariants:
//!
//! - `all_ids` and the keys of `by_id` are always the same set
//! - `all_ids` ordering is first-insertion order; replacing an entity never
//!   moves it
//! - `active_id`, when set, is a member of `all_ids`
//!
//! State values are immutable snapshots: every transition produces a whole
//! new value, computed by the mutators in [`mutate`] and committed by the
//! facade in a single observable-container `set`.

mod mutate;
mod select;

pub use select::Selector;

use crate::entity::Keyed;
use crate::key::EntityKey;
use std::collections::HashMap;

/// Canonical state of a collection: entities keyed by id, the ordered id
/// list, and the optional active pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    /// Entities by key.
    pub(crate) by_id: HashMap<EntityKey, T>,
    /// Every key, in first-insertion order.
    pub(crate) all_ids: Vec<EntityKey>,
    /// Key of the active entity, if any.
    pub(crate) active_id: Option<EntityKey>,
}

impl<T> Default for Normalized<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Normalized<T> {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_id: HashMap::new(),
            all_ids: Vec::new(),
            active_id: None,
        }
    }

    /// Returns the number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.all_ids.len()
    }

    /// Returns `true` if the collection holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.all_ids.is_empty()
    }

    /// Returns every key in first-insertion order.
    #[must_use]
    pub fn all_ids(&self) -> &[EntityKey] {
        &self.all_ids
    }

    /// Returns the active key, if one is set.
    #[must_use]
    pub fn active_id(&self) -> Option<&EntityKey> {
        self.active_id.as_ref()
    }

    /// Returns `true` if `key` is a member of the collection.
    #[must_use]
    pub fn contains(&self, key: &EntityKey) -> bool {
        self.by_id.contains_key(key)
    }

    /// Looks up a single entity by key.
    #[must_use]
    pub fn entity(&self, key: &EntityKey) -> Option<&T> {
        self.by_id.get(key)
    }

    /// Returns every entity in `all_ids` order.
    #[must_use]
    pub fn entities(&self) -> Vec<&T> {
        self.all_ids
            .iter()
            .filter_map(|id| self.by_id.get(id))
            .collect()
    }

    /// Looks up entities by key, preserving input order.
    ///
    /// Keys not present in the collection are silently dropped, so the
    /// result may be shorter than the input.
    #[must_use]
    pub fn entities_by_keys(&self, keys: &[EntityKey]) -> Vec<&T> {
        keys.iter().filter_map(|key| self.by_id.get(key)).collect()
    }

    /// Returns every entity matching the predicate, in collection order.
    pub fn entities_where(&self, pred: impl Fn(&T) -> bool) -> Vec<&T> {
        self.entities().into_iter().filter(|e| pred(e)).collect()
    }

    /// Returns the active entity, if one is set.
    #[must_use]
    pub fn active(&self) -> Option<&T> {
        self.active_id.as_ref().and_then(|id| self.by_id.get(id))
    }

    /// Checks the collection invariants.
    ///
    /// `all_ids` must be duplicate-free and match the key set of `by_id`
    /// exactly, and `active_id` must resolve to a member. Intended for
    /// tests and debug assertions; a state produced by the constructors and
    /// mutators of this crate is always consistent.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        if self.all_ids.len() != self.by_id.len() {
            return false;
        }
        let mut seen = std::collections::HashSet::new();
        for id in &self.all_ids {
            if !seen.insert(id) || !self.by_id.contains_key(id) {
                return false;
            }
        }
        match &self.active_id {
            Some(id) => self.by_id.contains_key(id),
            None => true,
        }
    }
}

impl<T: Keyed> Normalized<T> {
    /// Normalizes an ordered sequence of entities.
    ///
    /// For each item in input order: its key is computed and the item is
    /// inserted. A later duplicate overwrites the map entry, but the key
    /// keeps the position of its first occurrence. The active pointer
    /// always starts absent; hydration folds a stored pointer in
    /// separately.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Self {
        let mut state = Self::new();
        for item in items {
            let key = item.key();
            if state.by_id.insert(key.clone(), item).is_none() {
                state.all_ids.push(key);
            }
        }
        state
    }

    /// Sets the active pointer, dropping a non-member key to `None`.
    /// Used by hydration.
    pub(crate) fn with_active(mut self, active_id: Option<EntityKey>) -> Self {
        self.active_id = active_id.filter(|id| self.by_id.contains_key(id));
        self
    }
}
