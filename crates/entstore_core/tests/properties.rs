//! Property tests for collection invariants.

mod common;

use common::Todo;
use entstore_core::{EntityKey, EntityStore, Normalized, Selector};
use entstore_storage::{KvStore, MemoryKv};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

fn todo_strategy() -> impl Strategy<Value = Todo> {
    ("[a-e]", "[a-z]{0,8}", any::<bool>()).prop_map(|(id, text, done)| Todo {
        id,
        text,
        done,
        active: None,
    })
}

fn batch_strategy() -> impl Strategy<Value = Vec<Todo>> {
    prop::collection::vec(todo_strategy(), 0..20)
}

proptest! {
    /// `all_ids` order equals first-insertion order no matter how often a
    /// key is replaced later.
    #[test]
    fn insertion_order_is_preserved(batch in batch_strategy()) {
        let state = Normalized::from_items(batch.clone());

        let mut expected = Vec::new();
        let mut seen = HashSet::new();
        for item in &batch {
            if seen.insert(item.id.clone()) {
                expected.push(EntityKey::from(item.id.as_str()));
            }
        }

        prop_assert_eq!(state.all_ids(), expected.as_slice());
        prop_assert!(state.is_consistent());
    }

    /// The last occurrence of a key wins the value.
    #[test]
    fn later_duplicates_overwrite(batch in batch_strategy()) {
        let state = Normalized::from_items(batch.clone());

        for item in batch.iter().rev() {
            let key = EntityKey::from(item.id.as_str());
            prop_assert_eq!(state.entity(&key), Some(item));
            break;
        }
    }

    /// Any interleaving of set/remove/update/set_active keeps the state
    /// consistent.
    #[test]
    fn mutations_preserve_invariants(
        initial in batch_strategy(),
        ops in prop::collection::vec((0u8..4, "[a-e]"), 0..30),
    ) {
        let store = EntityStore::with_initial(initial);

        for (op, id) in ops {
            match op {
                0 => store.set(Todo {
                    id: id.clone(),
                    text: String::new(),
                    done: false,
                    active: None,
                }),
                1 => store.remove(id.as_str()),
                2 => store.update(
                    |t| Todo { done: !t.done, ..t.clone() },
                    id.as_str(),
                ),
                _ => store.set_active(id.as_str()),
            }
            prop_assert!(store.snapshot().is_consistent());
        }
    }

    /// `get(k)` and `get([k])` agree for every key ever inserted.
    #[test]
    fn single_and_list_lookups_agree(batch in batch_strategy()) {
        let store = EntityStore::with_initial(batch.clone());

        for item in &batch {
            let single = store.get(item.id.as_str()).get();
            let listed = store.get_many([item.id.as_str()]).get();
            prop_assert_eq!(single.as_slice(), listed.as_slice());
        }
    }

    /// Serializing, hydrating through a fresh store, and serializing again
    /// yields the same snapshot.
    #[test]
    fn persisted_snapshot_round_trips(batch in batch_strategy(), activate in "[a-e]") {
        let kv = Arc::new(MemoryKv::new());
        {
            let store = EntityStore::builder()
                .persist("prop")
                .storage(kv.clone())
                .build()
                .unwrap();
            store.set_many(batch);
            store.set_active(activate.as_str());
        }
        let first = kv.read("prop").unwrap();

        let _store = EntityStore::<Todo>::builder()
            .persist("prop")
            .storage(kv.clone())
            .build()
            .unwrap();
        let second = kv.read("prop").unwrap();

        let a: Option<serde_json::Value> =
            first.map(|raw| serde_json::from_str(&raw).unwrap());
        let b: Option<serde_json::Value> =
            second.map(|raw| serde_json::from_str(&raw).unwrap());
        prop_assert_eq!(a, b);
    }

    /// Removing by predicate matches removing by the resolved key list.
    #[test]
    fn predicate_and_key_list_removal_agree(batch in batch_strategy()) {
        let by_pred = EntityStore::with_initial(batch.clone());
        let by_keys = EntityStore::with_initial(batch);

        let done_keys: Vec<EntityKey> = by_keys
            .snapshot()
            .entities_where(|t| t.done)
            .into_iter()
            .map(|t| EntityKey::from(t.id.as_str()))
            .collect();

        by_pred.remove(Selector::filter(|t: &Todo| t.done));
        by_keys.remove(done_keys);

        prop_assert_eq!(by_pred.snapshot(), by_keys.snapshot());
    }
}
