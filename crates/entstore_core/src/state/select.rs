//! Selector resolution.
//!
//! A [`Selector`] is the tagged union of the five input shapes the store's
//! query and mutation operations accept: nothing, one key, a list of keys,
//! one entity, a list of entities, or a predicate. Entities reduce to their
//! keys at construction time, so resolution only ever deals with keys and
//! predicates.

use crate::entity::Keyed;
use crate::key::EntityKey;
use crate::state::Normalized;

/// A selector picking a subset of a collection.
///
/// Construct one through the `From` conversions (a key, or a vector/slice
/// of keys) or the explicit constructors ([`Selector::entity`],
/// [`Selector::entities`], [`Selector::filter`], [`Selector::all`]).
///
/// `Selector::Many(vec![])` selects nothing; it is distinct from
/// [`Selector::All`].
pub enum Selector<T> {
    /// Every entity, in collection order.
    All,
    /// A single key.
    One(EntityKey),
    /// A list of keys, resolved in input order.
    Many(Vec<EntityKey>),
    /// A predicate over entities, applied in collection order.
    Filter(Box<dyn Fn(&T) -> bool>),
}

impl<T> Selector<T> {
    /// Selects every entity.
    #[must_use]
    pub fn all() -> Self {
        Self::All
    }

    /// Selects a single key.
    pub fn key(key: impl Into<EntityKey>) -> Self {
        Self::One(key.into())
    }

    /// Selects a list of keys.
    pub fn keys<K: Into<EntityKey>>(keys: impl IntoIterator<Item = K>) -> Self {
        Self::Many(keys.into_iter().map(Into::into).collect())
    }

    /// Selects by predicate.
    pub fn filter(pred: impl Fn(&T) -> bool + 'static) -> Self {
        Self::Filter(Box::new(pred))
    }
}

impl<T: Keyed> Selector<T> {
    /// Selects a single entity, by its key.
    pub fn entity(entity: &T) -> Self {
        Self::One(entity.key())
    }

    /// Selects a list of entities, by their keys.
    pub fn entities<'a>(entities: impl IntoIterator<Item = &'a T>) -> Self
    where
        T: 'a,
    {
        Self::Many(entities.into_iter().map(Keyed::key).collect())
    }
}

impl<T> From<EntityKey> for Selector<T> {
    fn from(key: EntityKey) -> Self {
        Self::One(key)
    }
}

impl<T> From<&EntityKey> for Selector<T> {
    fn from(key: &EntityKey) -> Self {
        Self::One(key.clone())
    }
}

impl<T> From<&str> for Selector<T> {
    fn from(key: &str) -> Self {
        Self::One(key.into())
    }
}

impl<T> From<String> for Selector<T> {
    fn from(key: String) -> Self {
        Self::One(key.into())
    }
}

impl<T> From<i64> for Selector<T> {
    fn from(key: i64) -> Self {
        Self::One(key.into())
    }
}

impl<T> From<i32> for Selector<T> {
    fn from(key: i32) -> Self {
        Self::One(key.into())
    }
}

impl<T> From<u32> for Selector<T> {
    fn from(key: u32) -> Self {
        Self::One(key.into())
    }
}

impl<T, K: Into<EntityKey>> From<Vec<K>> for Selector<T> {
    fn from(keys: Vec<K>) -> Self {
        Self::keys(keys)
    }
}

impl<T, K: Into<EntityKey> + Clone> From<&[K]> for Selector<T> {
    fn from(keys: &[K]) -> Self {
        Self::keys(keys.iter().cloned())
    }
}

impl<T, K: Into<EntityKey>, const N: usize> From<[K; N]> for Selector<T> {
    fn from(keys: [K; N]) -> Self {
        Self::keys(keys)
    }
}

impl<T> std::fmt::Debug for Selector<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("Selector::All"),
            Self::One(key) => f.debug_tuple("Selector::One").field(key).finish(),
            Self::Many(keys) => f.debug_tuple("Selector::Many").field(keys).finish(),
            Self::Filter(_) => f.write_str("Selector::Filter(..)"),
        }
    }
}

impl<T: Keyed> Normalized<T> {
    /// Resolves a selector to the keys it targets, in priority order:
    /// absent input selects everything, a key list resolves member-wise in
    /// input order, a predicate filters in collection order, and a single
    /// key resolves to zero or one member.
    ///
    /// Unknown keys are silently dropped, never an error.
    #[must_use]
    pub fn resolve_keys(&self, selector: &Selector<T>) -> Vec<EntityKey> {
        match selector {
            Selector::All => self.all_ids.clone(),
            Selector::Many(keys) => keys
                .iter()
                .filter(|key| self.by_id.contains_key(key))
                .cloned()
                .collect(),
            Selector::Filter(pred) => self
                .all_ids
                .iter()
                .filter(|id| self.by_id.get(id).is_some_and(|e| pred(e)))
                .cloned()
                .collect(),
            Selector::One(key) => {
                if self.by_id.contains_key(key) {
                    vec![key.clone()]
                } else {
                    Vec::new()
                }
            }
        }
    }
}
