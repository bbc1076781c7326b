//! Test fixtures and store helpers.
//!
//! Provides a ready-made entity type and convenience helpers for setting
//! up stores and observing their notifications in tests.

use entstore_core::{EntityKey, EntityStore, Keyed, Normalized};
use entstore_storage::MemoryKv;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// A task entity used across test suites.
///
/// Implements the active convention through its `active` field, so it can
/// exercise flag-driven promotion and deactivation as well as plain
/// pointer management.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique id; doubles as the entity key.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Completion marker.
    pub done: bool,
    /// Active convention flag; `None` opts out for a given value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl Task {
    /// Creates an open task.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            done: false,
            active: None,
        }
    }

    /// Marks the task as done.
    #[must_use]
    pub fn done(mut self) -> Self {
        self.done = true;
        self
    }

    /// Sets the active convention flag.
    #[must_use]
    pub fn flagged_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }
}

impl Keyed for Task {
    fn key(&self) -> EntityKey {
        EntityKey::from(self.id.as_str())
    }

    fn active_flag(&self) -> Option<bool> {
        self.active
    }
}

/// Creates a store prefilled with `count` tasks with ids `task-0` through
/// `task-{count-1}`.
#[must_use]
pub fn seeded_store(count: usize) -> EntityStore<Task> {
    EntityStore::with_initial(
        (0..count).map(|i| Task::new(format!("task-{i}"), format!("Task {i}"))),
    )
}

/// Builds an in-memory durable store preloaded with a serialized snapshot
/// of `tasks`, in the persisted `{byId, allIds, activeId}` shape.
///
/// Useful for hydration tests that need a stored snapshot without first
/// running a store against the kv.
#[must_use]
pub fn preloaded_kv(storage_key: &str, tasks: &[Task], active_id: Option<&str>) -> MemoryKv {
    let by_id: serde_json::Map<String, serde_json::Value> = tasks
        .iter()
        .map(|t| (t.id.clone(), serde_json::to_value(t).unwrap_or(json!(null))))
        .collect();
    let all_ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();

    let mut snapshot = json!({ "byId": by_id, "allIds": all_ids });
    if let Some(active) = active_id {
        snapshot["activeId"] = json!(active);
    }

    MemoryKv::with_entries([(storage_key.to_string(), snapshot.to_string())])
}

/// Records every snapshot a store commits after attachment.
///
/// The initial delivery that `subscribe` performs is discarded, so
/// [`len`](Self::len) counts exactly the notifications caused by
/// subsequent mutations.
pub struct ChangeLog<T> {
    snapshots: Arc<Mutex<Vec<Normalized<T>>>>,
}

impl<T: Keyed + Clone + Send + 'static> ChangeLog<T> {
    /// Subscribes to `store` and starts recording.
    #[must_use]
    pub fn attach(store: &EntityStore<T>) -> Self {
        let snapshots = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&snapshots);
        drop(store.subscribe(move |state| sink.lock().push(state.clone())));
        snapshots.lock().clear();
        Self { snapshots }
    }

    /// Returns the number of notifications recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.lock().len()
    }

    /// Returns `true` if no notification has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.lock().is_empty()
    }

    /// Returns the recorded snapshots in commit order.
    #[must_use]
    pub fn snapshots(&self) -> Vec<Normalized<T>> {
        self.snapshots.lock().clone()
    }

    /// Returns the most recent snapshot, if any.
    #[must_use]
    pub fn last(&self) -> Option<Normalized<T>> {
        self.snapshots.lock().last().cloned()
    }

    /// Discards everything recorded so far.
    pub fn clear(&self) {
        self.snapshots.lock().clear();
    }
}
