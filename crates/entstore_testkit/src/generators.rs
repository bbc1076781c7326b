//! Property-based test generators using proptest.
//!
//! Provides strategies for generating keys and entity batches that
//! exercise the collection invariants.

use crate::fixtures::Task;
use entstore_core::EntityKey;
use proptest::prelude::*;

/// Strategy for generating entity keys, mixing text and integer variants.
pub fn entity_key_strategy() -> impl Strategy<Value = EntityKey> {
    prop_oneof![
        "[a-z]{1,8}".prop_map(EntityKey::from),
        any::<i64>().prop_map(EntityKey::from),
    ]
}

/// Strategy for generating a task with an id drawn from a small pool,
/// so batches contain duplicate keys often enough to exercise
/// replace-in-place behavior.
pub fn task_strategy() -> impl Strategy<Value = Task> {
    ("[a-h]", "[A-Za-z ]{0,12}", any::<bool>()).prop_map(|(id, title, done)| Task {
        id,
        title,
        done,
        active: None,
    })
}

/// Strategy for generating a batch of tasks.
pub fn task_batch_strategy(max: usize) -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec(task_strategy(), 0..max.max(1))
}

/// Strategy for generating a batch of tasks with pairwise-distinct keys.
pub fn unique_task_batch_strategy(max: usize) -> impl Strategy<Value = Vec<Task>> {
    prop::collection::hash_set("[a-z]{1,6}", 0..max.max(1)).prop_map(|ids| {
        ids.into_iter()
            .map(|id| {
                let title = format!("Task {id}");
                Task::new(id, title)
            })
            .collect()
    })
}
