//! Persistence adapter.
//!
//! Bridges a store to a [`KvStore`]: hydration reads the persisted snapshot
//! once at construction, and a subscription re-writes the full serialized
//! state on every committed snapshot thereafter.
//!
//! The persisted value is the plain structural form of the canonical state,
//! `{"byId": ..., "allIds": ..., "activeId": ...}`. JSON object keys are
//! strings, so `byId` is keyed by the rendered form of each key while
//! `allIds` and `activeId` keep their natural JSON types; hydration
//! re-links the map through `allIds`, so integer and text keys never
//! conflate.
//!
//! Error policy: a malformed or structurally inconsistent snapshot falls
//! back to the caller-supplied initial items and is logged, never raised.
//! A store that cannot be read at construction surfaces
//! [`StoreError::Storage`](crate::StoreError::Storage); a write failure
//! after construction is logged and absorbed, the in-memory state stays
//! authoritative.

use crate::error::StoreResult;
use crate::key::EntityKey;
use crate::state::Normalized;
use entstore_reactive::Writable;
use entstore_storage::KvStore;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Serialized form of the canonical state.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredState<T> {
    by_id: HashMap<String, T>,
    all_ids: Vec<EntityKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    active_id: Option<EntityKey>,
}

/// Serializes canonical state to its persisted JSON form.
pub(crate) fn encode_state<T>(state: &Normalized<T>) -> serde_json::Result<String>
where
    T: Clone + Serialize,
{
    let stored = StoredState {
        by_id: state
            .all_ids()
            .iter()
            .filter_map(|id| state.entity(id).map(|e| (id.to_string(), e.clone())))
            .collect(),
        all_ids: state.all_ids().to_vec(),
        active_id: state.active_id().cloned(),
    };
    serde_json::to_string(&stored)
}

/// Decodes a persisted snapshot back into items (in `allIds` order) and the
/// stored active key.
///
/// Returns `None` for anything that does not parse into a consistent
/// snapshot: invalid JSON, a duplicate id, an id without a `byId` entry, or
/// a `byId` entry no id references.
fn decode_state<T: DeserializeOwned>(raw: &str) -> Option<(Vec<T>, Option<EntityKey>)> {
    let stored: StoredState<T> = serde_json::from_str(raw).ok()?;

    let mut by_id = stored.by_id;
    let mut items = Vec::with_capacity(stored.all_ids.len());
    for id in &stored.all_ids {
        items.push(by_id.remove(&id.to_string())?);
    }
    if !by_id.is_empty() {
        return None;
    }

    Some((items, stored.active_id))
}

/// Reads the snapshot stored under `storage_key`.
///
/// An absent key or a malformed snapshot yields the fallback items with no
/// active key; only a failing read surfaces an error.
pub(crate) fn hydrate<T: DeserializeOwned>(
    kv: &dyn KvStore,
    storage_key: &str,
    fallback: Vec<T>,
) -> StoreResult<(Vec<T>, Option<EntityKey>)> {
    match kv.read(storage_key)? {
        None => {
            debug!(storage_key, "no persisted snapshot, using initial items");
            Ok((fallback, None))
        }
        Some(raw) => match decode_state(&raw) {
            Some((items, active_id)) => {
                debug!(storage_key, entities = items.len(), "hydrated snapshot");
                Ok((items, active_id))
            }
            None => {
                warn!(storage_key, "persisted snapshot is malformed, using initial items");
                Ok((fallback, None))
            }
        },
    }
}

/// Subscribes a writer that re-persists every committed snapshot.
///
/// The subscription runs for the lifetime of the cell; it writes the
/// current snapshot immediately, then once per commit. It never re-enters
/// the store.
pub(crate) fn attach<T>(cell: &Writable<Normalized<T>>, kv: Arc<dyn KvStore>, storage_key: String)
where
    T: Clone + Serialize + 'static,
{
    let subscription = cell.subscribe(move |state| {
        match encode_state(state) {
            Ok(raw) => {
                if let Err(e) = kv.write(&storage_key, &raw) {
                    warn!(storage_key, error = %e, "failed to persist snapshot");
                }
            }
            Err(e) => warn!(storage_key, error = %e, "failed to serialize snapshot"),
        }
    });
    // Dropping the handle keeps the callback registered.
    drop(subscription);
}
