//! Stable object identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Reserved identifier of the room shell
pub const ROOM_ID: &str = "room-model";

/// Last timestamp handed out by [`ObjectId::generate`]
static LAST_STAMP: AtomicU64 = AtomicU64::new(0);

/// Identifier of a placed object or the room shell.
///
/// Descriptors usually carry their own id (a backend record id or a name).
/// When they don't, a millisecond timestamp is used, bumped forward so two
/// ids generated in the same millisecond still differ.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The reserved room id
    pub fn room() -> Self {
        Self(ROOM_ID.to_string())
    }

    /// Generate a timestamp-based id
    pub fn generate() -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let mut last = LAST_STAMP.load(Ordering::Relaxed);
        loop {
            let next = now.max(last + 1);
            match LAST_STAMP.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return Self(next.to_string()),
                Err(current) => last = current,
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_room(&self) -> bool {
        self.0 == ROOM_ID
    }

    /// Derive `"{id}-{n}"`, used to keep ids unique inside a registry
    pub fn with_suffix(&self, n: usize) -> Self {
        Self(format!("{}-{}", self.0, n))
    }
}

impl From<&str> for ObjectId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ObjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
