//! A small playable world: one player, a clock, a market and three NPCs.

use palaver_content::{GameClock, Market, Player, SharedMarket, greeter, market_manager, princess};
use palaver_engine::{Actor, NpcDefinition, NpcRegistry, Position, Reply};
use palaver_foundation::{ConversationState, Error, NpcId, Result};
use tracing::{debug, info};

/// Name of the demo player.
pub const PLAYER_NAME: &str = "traveller";

/// What happened during one [`World::tick`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Game minute after the tick
    pub minute: u64,
    /// NPCs that walked, with their new positions
    pub moved: Vec<(String, Position)>,
    /// Offers that expired
    pub expired: usize,
}

/// The session a REPL drives.
pub struct World {
    registry: NpcRegistry<Player>,
    player: Player,
    clock: GameClock,
    market: SharedMarket,
    current: Option<String>,
}

impl World {
    /// Creates a world with no NPCs.
    #[must_use]
    pub fn new(player: Player) -> Self {
        Self {
            registry: NpcRegistry::new(),
            player,
            clock: GameClock::new(),
            market: Market::new().shared(),
            current: None,
        }
    }

    /// Creates the demo world.
    ///
    /// The player starts with some money and a drink, and owns a few offers
    /// on the market, one of them already expired. `seed` drives the
    /// princess's reward.
    ///
    /// # Errors
    ///
    /// Returns an error if an NPC definition fails to build.
    pub fn demo(seed: u64) -> Result<Self> {
        let mut player = Player::new(1, PLAYER_NAME).with_money(500);
        player.equip(princess::DRINK, 1);
        let mut world = Self::new(player);

        {
            let mut market = world
                .market
                .lock()
                .map_err(|_| Error::internal("market lock poisoned"))?;
            market.place_offer(PLAYER_NAME, "fish pie", 3, 250, 0);
            let old = market.place_offer(PLAYER_NAME, "apple", 12, 60, 0);
            market.expire(old);
            market.place_offer("bob", "pina colada", 1, 120, 0);
        }

        world.spawn(&greeter::definition())?;
        world.spawn(&princess::definition(world.clock.clone(), seed))?;
        world.spawn(&market_manager::definition(
            world.market.clone(),
            world.clock.clone(),
        ))?;
        info!(npcs = world.registry.len(), "demo world ready");
        Ok(world)
    }

    /// Adds an NPC.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken or the definition fails.
    pub fn spawn(&mut self, definition: &NpcDefinition<Player>) -> Result<NpcId> {
        self.registry.spawn(definition)
    }

    /// The NPCs.
    #[must_use]
    pub fn registry(&self) -> &NpcRegistry<Player> {
        &self.registry
    }

    /// The player.
    #[must_use]
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// The player, for setting up scenarios.
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// The game clock.
    #[must_use]
    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    /// The shared market.
    #[must_use]
    pub fn market(&self) -> &SharedMarket {
        &self.market
    }

    /// Name of the NPC the player is talking to.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// State of the conversation with the current NPC, if one was started.
    #[must_use]
    pub fn current_state(&self) -> Option<ConversationState> {
        let npc = self.registry.get(self.current.as_deref()?)?;
        npc.context(self.player.id()).map(|context| context.state())
    }

    /// Turns to an NPC and returns its proper name.
    ///
    /// Returns `None` if no NPC has that name; the current NPC is kept.
    pub fn approach(&mut self, name: &str) -> Option<&str> {
        let found = self.registry.get(name.trim())?.name().to_string();
        debug!(npc = %found, "approached");
        self.current = Some(found);
        self.current.as_deref()
    }

    /// Walks away from the current NPC, running its abandonment rules.
    ///
    /// Returns the NPC's parting words, if a conversation had started.
    pub fn leave(&mut self) -> Option<Reply> {
        let name = self.current.take()?;
        self.registry.get_mut(&name)?.abandon(&mut self.player)
    }

    /// Says a line to the current NPC.
    ///
    /// Returns `None` if the player is not facing anyone.
    pub fn say(&mut self, text: &str) -> Option<Reply> {
        let npc = self.registry.get_mut(self.current.as_deref()?)?;
        Some(npc.talk(&mut self.player, text))
    }

    /// Advances game time, walks idle NPCs and expires old offers.
    ///
    /// # Errors
    ///
    /// Returns an error if the market lock is poisoned.
    pub fn tick(&mut self, minutes: u64) -> Result<TickReport> {
        let minute = self.clock.advance(minutes);
        let moved = self
            .registry
            .tick_all()
            .into_iter()
            .filter_map(|(id, position)| {
                let name = self.registry.get_by_id(id)?.name().to_string();
                Some((name, position))
            })
            .collect();
        let expired = self
            .market
            .lock()
            .map_err(|_| Error::internal("market lock poisoned"))?
            .sweep(minute);
        Ok(TickReport {
            minute,
            moved,
            expired,
        })
    }
}
