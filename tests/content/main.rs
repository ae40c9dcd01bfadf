//! Integration tests for Layer 3: Content
//!
//! Whole conversations with the bundled NPCs.

mod greeter;
mod market;

use palaver_content::Player;
use palaver_engine::{Npc, NpcBuilder, NpcDefinition};
use palaver_foundation::NpcId;

pub fn build(definition: &NpcDefinition<Player>) -> Npc<Player> {
    NpcBuilder::build(definition, NpcId::new(1)).unwrap()
}

/// Says a line and returns the whole reply text.
pub fn say(npc: &mut Npc<Player>, player: &mut Player, text: &str) -> String {
    npc.talk(player, text).text()
}
