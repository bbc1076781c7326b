//! Entity key type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of an entity within a collection.
///
/// Keys are string-or-integer values compared by value equality:
/// `EntityKey::Int(1)` and `EntityKey::Text("1".into())` are distinct keys.
///
/// Keys serialize to their natural JSON form (a number or a string), which
/// is what the persisted snapshot format expects in `allIds` and
/// `activeId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityKey {
    /// Integer key.
    Int(i64),
    /// String key.
    Text(String),
}

impl EntityKey {
    /// Returns the string form if this is a text key.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Int(_) => None,
        }
    }

    /// Returns the integer form if this is an integer key.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for EntityKey {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for EntityKey {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for EntityKey {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl From<i64> for EntityKey {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for EntityKey {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<u32> for EntityKey {
    fn from(n: u32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<&EntityKey> for EntityKey {
    fn from(key: &EntityKey) -> Self {
        key.clone()
    }
}
