//! A ready-made quest slot store.

use std::fmt;

/// Persistent map of quest slots for one actor.
///
/// Backed by an `im` hash map so that snapshots taken before a risky
/// exchange are cheap and share structure with the live log.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct QuestLog {
    slots: im::HashMap<String, String>,
}

impl QuestLog {
    /// Creates an empty quest log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a slot.
    #[must_use]
    pub fn get(&self, slot: &str) -> Option<&str> {
        self.slots.get(slot).map(String::as_str)
    }

    /// Writes a slot, returning the previous value.
    pub fn set(&mut self, slot: &str, value: &str) -> Option<String> {
        self.slots.insert(slot.to_string(), value.to_string())
    }

    /// Removes a slot.
    pub fn remove(&mut self, slot: &str) -> Option<String> {
        self.slots.remove(slot)
    }

    /// Number of slots written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no slot was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterates over `(slot, value)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.slots.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Debug for QuestLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable();
        f.debug_map().entries(entries).finish()
    }
}
