//! State transitions.
//!
//! Each mutator is a pure function from one canonical state to the next.
//! `None` means "nothing changed": the facade commits nothing and
//! subscribers see no snapshot. The no-change skip lives here, in the
//! mutators, never in projections.

use crate::entity::Keyed;
use crate::key::EntityKey;
use crate::state::{Normalized, Selector};

impl<T: Keyed + Clone> Normalized<T> {
    /// Inserts or replaces entities.
    ///
    /// Existing keys are replaced in place and keep their position; new
    /// keys are appended in input order. An item whose
    /// [`active_flag`](Keyed::active_flag) is `Some(true)` promotes itself
    /// to active. Empty input changes nothing.
    #[must_use]
    pub fn set_entities(&self, items: Vec<T>) -> Option<Self> {
        if items.is_empty() {
            return None;
        }

        let mut next = self.clone();
        for item in items {
            let key = item.key();
            if item.active_flag() == Some(true) {
                next.active_id = Some(key.clone());
            }
            if next.by_id.insert(key.clone(), item).is_none() {
                next.all_ids.push(key);
            }
        }
        Some(next)
    }

    /// Removes the entities the selector resolves to.
    ///
    /// Unknown keys and entities are ignored. Removing the active entity
    /// clears the active pointer. A selector resolving to nothing changes
    /// nothing.
    #[must_use]
    pub fn remove_entities(&self, selector: &Selector<T>) -> Option<Self> {
        let targets = self.resolve_keys(selector);
        if targets.is_empty() {
            return None;
        }

        let mut next = self.clone();
        for key in &targets {
            if next.by_id.remove(key).is_some() {
                next.all_ids.retain(|id| id != key);
                if next.active_id.as_ref() == Some(key) {
                    next.active_id = None;
                }
            }
        }
        Some(next)
    }

    /// Runs the entities the selector resolves to through `updater`.
    ///
    /// The stored entry's key stays authoritative: an updater that alters
    /// the entity's own id field neither re-keys nor duplicates the entry,
    /// and positions in the id list never change. Updating the active
    /// entity to a value whose [`active_flag`](Keyed::active_flag) is
    /// `Some(false)` clears the active pointer. A selector resolving to
    /// nothing changes nothing.
    #[must_use]
    pub fn update_entities(&self, updater: impl Fn(&T) -> T, selector: &Selector<T>) -> Option<Self> {
        let targets = self.resolve_keys(selector);
        if targets.is_empty() {
            return None;
        }

        let mut next = self.clone();
        for key in &targets {
            if let Some(current) = next.by_id.get(key) {
                let updated = updater(current);
                if next.active_id.as_ref() == Some(key) && updated.active_flag() == Some(false) {
                    next.active_id = None;
                }
                next.by_id.insert(key.clone(), updated);
            }
        }
        Some(next)
    }

    /// Moves the active pointer to `key`.
    ///
    /// Activating a non-member is a silent no-op, as is re-activating the
    /// key that is already active. Entity values are never touched; only
    /// the pointer moves.
    #[must_use]
    pub fn set_active(&self, key: &EntityKey) -> Option<Self> {
        if !self.by_id.contains_key(key) {
            return None;
        }
        if self.active_id.as_ref() == Some(key) {
            return None;
        }

        let mut next = self.clone();
        next.active_id = Some(key.clone());
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Doc {
        id: &'static str,
        rev: u32,
        current: Option<bool>,
    }

    impl Keyed for Doc {
        fn key(&self) -> EntityKey {
            EntityKey::from(self.id)
        }

        fn active_flag(&self) -> Option<bool> {
            self.current
        }
    }

    fn doc(id: &'static str, rev: u32) -> Doc {
        Doc {
            id,
            rev,
            current: None,
        }
    }

    fn base() -> Normalized<Doc> {
        Normalized::from_items([doc("a", 1), doc("b", 1)])
    }

    #[test]
    fn set_appends_new_keys_in_input_order() {
        let next = base()
            .set_entities(vec![doc("c", 1), doc("d", 1)])
            .unwrap();

        assert_eq!(
            next.all_ids(),
            &["a".into(), "b".into(), "c".into(), "d".into()] as &[EntityKey]
        );
        assert!(next.is_consistent());
    }

    #[test]
    fn set_replaces_without_moving_position() {
        let next = base().set_entities(vec![doc("a", 7)]).unwrap();

        assert_eq!(next.all_ids(), &["a".into(), "b".into()] as &[EntityKey]);
        assert_eq!(next.entity(&"a".into()).unwrap().rev, 7);
    }

    #[test]
    fn set_with_empty_input_is_unchanged() {
        assert!(base().set_entities(Vec::new()).is_none());
    }

    #[test]
    fn set_promotes_flagged_entity_to_active() {
        let flagged = Doc {
            id: "c",
            rev: 1,
            current: Some(true),
        };
        let next = base().set_entities(vec![flagged]).unwrap();
        assert_eq!(next.active_id(), Some(&"c".into()));
    }

    #[test]
    fn set_without_flag_leaves_pointer_alone() {
        let state = base().set_active(&"a".into()).unwrap();
        let next = state.set_entities(vec![doc("a", 2)]).unwrap();
        assert_eq!(next.active_id(), Some(&"a".into()));
    }

    #[test]
    fn remove_by_key_and_key_list() {
        let next = base().remove_entities(&Selector::from("a")).unwrap();
        assert_eq!(next.all_ids(), &["b".into()] as &[EntityKey]);

        let next = base()
            .remove_entities(&Selector::from(vec!["a", "b"]))
            .unwrap();
        assert!(next.is_empty());
    }

    #[test]
    fn remove_by_predicate() {
        let next = base()
            .remove_entities(&Selector::filter(|d: &Doc| d.id == "b"))
            .unwrap();
        assert_eq!(next.all_ids(), &["a".into()] as &[EntityKey]);
    }

    #[test]
    fn remove_unknown_is_unchanged() {
        assert!(base().remove_entities(&Selector::from("zzz")).is_none());
        assert!(base()
            .remove_entities(&Selector::filter(|_: &Doc| false))
            .is_none());
    }

    #[test]
    fn remove_mixed_known_and_unknown_removes_the_known() {
        let next = base()
            .remove_entities(&Selector::from(vec!["zzz", "b"]))
            .unwrap();
        assert_eq!(next.all_ids(), &["a".into()] as &[EntityKey]);
    }

    #[test]
    fn removing_the_active_entity_clears_the_pointer() {
        let state = base().set_active(&"a".into()).unwrap();
        let next = state.remove_entities(&Selector::from("a")).unwrap();
        assert_eq!(next.active_id(), None);
        assert!(next.is_consistent());
    }

    #[test]
    fn update_all_touches_every_entity() {
        let next = base()
            .update_entities(|d| Doc { rev: d.rev + 1, ..d.clone() }, &Selector::All)
            .unwrap();

        assert_eq!(next.entity(&"a".into()).unwrap().rev, 2);
        assert_eq!(next.entity(&"b".into()).unwrap().rev, 2);
    }

    #[test]
    fn update_by_selector_touches_only_targets() {
        let next = base()
            .update_entities(|d| Doc { rev: 9, ..d.clone() }, &Selector::from("a"))
            .unwrap();

        assert_eq!(next.entity(&"a".into()).unwrap().rev, 9);
        assert_eq!(next.entity(&"b".into()).unwrap().rev, 1);
    }

    #[test]
    fn update_never_reorders() {
        let next = base()
            .update_entities(|d| d.clone(), &Selector::from(vec!["b", "a"]))
            .unwrap();
        assert_eq!(next.all_ids(), &["a".into(), "b".into()] as &[EntityKey]);
    }

    #[test]
    fn update_with_empty_resolution_is_unchanged() {
        assert!(base()
            .update_entities(|d| d.clone(), &Selector::from("zzz"))
            .is_none());
        assert!(base()
            .update_entities(|d| d.clone(), &Selector::Many(Vec::new()))
            .is_none());
    }

    #[test]
    fn update_does_not_rekey_when_updater_changes_the_id() {
        let next = base()
            .update_entities(|d| Doc { id: "mutant", ..d.clone() }, &Selector::from("a"))
            .unwrap();

        assert_eq!(next.all_ids(), &["a".into(), "b".into()] as &[EntityKey]);
        assert_eq!(next.entity(&"a".into()).unwrap().id, "mutant");
        assert_eq!(next.entity(&"mutant".into()), None);
    }

    #[test]
    fn update_can_deactivate_the_active_entity() {
        let state = Normalized::new()
            .set_entities(vec![Doc {
                id: "a",
                rev: 1,
                current: Some(true),
            }])
            .unwrap();
        assert_eq!(state.active_id(), Some(&"a".into()));

        let next = state
            .update_entities(
                |d| Doc { current: Some(false), ..d.clone() },
                &Selector::from("a"),
            )
            .unwrap();
        assert_eq!(next.active_id(), None);
    }

    #[test]
    fn update_of_opted_out_active_entity_keeps_the_pointer() {
        let state = base().set_active(&"a".into()).unwrap();
        let next = state
            .update_entities(|d| Doc { rev: 5, ..d.clone() }, &Selector::from("a"))
            .unwrap();
        assert_eq!(next.active_id(), Some(&"a".into()));
    }

    #[test]
    fn set_active_on_member_moves_the_pointer() {
        let state = base().set_active(&"a".into()).unwrap();
        assert_eq!(state.active_id(), Some(&"a".into()));

        let next = state.set_active(&"b".into()).unwrap();
        assert_eq!(next.active_id(), Some(&"b".into()));
    }

    #[test]
    fn set_active_on_non_member_is_unchanged() {
        assert!(base().set_active(&"zzz".into()).is_none());
    }

    #[test]
    fn set_active_on_current_active_is_unchanged() {
        let state = base().set_active(&"a".into()).unwrap();
        assert!(state.set_active(&"a".into()).is_none());
    }

    #[test]
    fn set_active_leaves_entity_values_untouched() {
        let state = base();
        let next = state.set_active(&"a".into()).unwrap();
        assert_eq!(next.entity(&"a".into()), state.entity(&"a".into()));
        assert_eq!(next.entity(&"b".into()), state.entity(&"b".into()));
    }
}
