//! Explicit registry of live NPCs.
//!
//! A world owns one registry; there is no process-wide list, so several
//! worlds (or tests) can coexist.

use std::collections::BTreeMap;

use palaver_foundation::{Error, NpcId, Result};
use tracing::info;

use crate::definition::{NpcBuilder, NpcDefinition};
use crate::npc::Npc;
use crate::path::Position;

/// NPCs of one world, looked up by case-insensitive name.
pub struct NpcRegistry<A> {
    npcs: BTreeMap<String, Npc<A>>,
    next_id: u32,
}

impl<A> NpcRegistry<A> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            npcs: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Builds an NPC from its definition and registers it.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateNpc` if the name is taken, or the construction
    /// error of the definition. The registry is unchanged on error.
    pub fn spawn(&mut self, definition: &NpcDefinition<A>) -> Result<NpcId> {
        let key = definition.name().to_lowercase();
        if self.npcs.contains_key(&key) {
            return Err(Error::duplicate_npc(definition.name()));
        }
        let id = NpcId::new(self.next_id);
        let npc = NpcBuilder::build(definition, id)?;
        self.next_id += 1;
        info!(npc = %npc.name(), %id, position = %npc.position(), "npc spawned");
        self.npcs.insert(key, npc);
        Ok(id)
    }

    /// Looks up an NPC by name. `None` means nothing is registered under it.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Npc<A>> {
        self.npcs.get(&name.to_lowercase())
    }

    /// Looks up an NPC by name for talking or ticking.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Npc<A>> {
        self.npcs.get_mut(&name.to_lowercase())
    }

    /// Looks up an NPC by identity.
    #[must_use]
    pub fn get_by_id(&self, id: NpcId) -> Option<&Npc<A>> {
        self.npcs.values().find(|npc| npc.id() == id)
    }

    /// Removes an NPC, dropping its conversations.
    pub fn remove(&mut self, name: &str) -> Option<Npc<A>> {
        let npc = self.npcs.remove(&name.to_lowercase())?;
        info!(npc = %npc.name(), "npc removed");
        Some(npc)
    }

    /// Removes every NPC.
    pub fn clear(&mut self) {
        if !self.npcs.is_empty() {
            info!(count = self.npcs.len(), "registry cleared");
        }
        self.npcs.clear();
    }

    /// Names of all NPCs, sorted case-insensitively.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.npcs.values().map(Npc::name).collect()
    }

    /// Iterates over all NPCs.
    pub fn iter(&self) -> impl Iterator<Item = &Npc<A>> {
        self.npcs.values()
    }

    /// Advances every idle NPC along its path; returns who moved where.
    pub fn tick_all(&mut self) -> Vec<(NpcId, Position)> {
        self.npcs
            .values_mut()
            .filter_map(|npc| npc.tick().map(|pos| (npc.id(), pos)))
            .collect()
    }

    /// Number of NPCs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.npcs.len()
    }

    /// Returns true if there are no NPCs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.npcs.is_empty()
    }
}

impl<A> Default for NpcRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> std::fmt::Debug for NpcRegistry<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NpcRegistry")
            .field("npcs", &self.names())
            .finish_non_exhaustive()
    }
}
