//! The player-side collaborator contract.

use palaver_foundation::ActorId;

/// Someone an NPC can talk to.
///
/// Besides identity, an actor exposes the key-to-string quest slots that
/// conditions and actions read and write. The engine neither defines nor
/// validates the strings stored there; conventions such as `"start"` or
/// `"done;0"` belong to the content that uses them.
pub trait Actor {
    /// Stable identity used to key conversation contexts.
    fn id(&self) -> ActorId;

    /// Display name.
    fn name(&self) -> &str;

    /// Reads a quest slot.
    fn quest(&self, slot: &str) -> Option<&str>;

    /// Writes a quest slot.
    fn set_quest(&mut self, slot: &str, value: &str);

    /// Reads the `index`-th `;`-separated part of a quest slot.
    fn quest_part(&self, slot: &str, index: usize) -> Option<&str> {
        self.quest(slot).and_then(|value| value.split(';').nth(index))
    }

    /// Returns true if the slot has ever been written.
    fn has_quest(&self, slot: &str) -> bool {
        self.quest(slot).is_some()
    }
}
