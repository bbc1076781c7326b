//! Shared fixtures for the integration suites.

use entstore_core::{EntityKey, Keyed};
use serde::{Deserialize, Serialize};

/// Todo item used across the integration tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub text: String,
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl Keyed for Todo {
    fn key(&self) -> EntityKey {
        EntityKey::from(self.id.as_str())
    }

    fn active_flag(&self) -> Option<bool> {
        self.active
    }
}

#[allow(dead_code)]
pub fn todo(id: &str, text: &str) -> Todo {
    Todo {
        id: id.to_string(),
        text: text.to_string(),
        done: false,
        active: None,
    }
}

#[allow(dead_code)]
pub fn active_todo(id: &str, text: &str) -> Todo {
    Todo {
        active: Some(true),
        ..todo(id, text)
    }
}
