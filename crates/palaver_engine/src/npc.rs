//! Live NPCs.
//!
//! An [`Npc`] owns its dialogue engine and one [`ConversationContext`] per
//! player it has talked to. Dormant contexts (back in the initial state with
//! no scratch data) are evicted once there are too many of them; an
//! exchange in progress is only ever ended through [`Npc::abandon`].

use std::collections::{BTreeMap, HashMap};

use palaver_foundation::{ActorId, NpcId};
use tracing::{debug, info_span};

use crate::actor::Actor;
use crate::config::NpcConfig;
use crate::context::ConversationContext;
use crate::engine::{DialogueEngine, Reply};
use crate::path::{PatrolPath, Position};

struct Slot {
    context: ConversationContext,
    last_used: u64,
}

/// A character players can talk to.
pub struct Npc<A> {
    id: NpcId,
    name: String,
    description: Option<String>,
    engine: DialogueEngine<A>,
    contexts: HashMap<ActorId, Slot>,
    path: PatrolPath,
    attributes: BTreeMap<String, String>,
    config: NpcConfig,
    clock: u64,
}

impl<A> Npc<A> {
    pub(crate) fn new(
        id: NpcId,
        name: String,
        description: Option<String>,
        engine: DialogueEngine<A>,
        path: PatrolPath,
        attributes: BTreeMap<String, String>,
        config: NpcConfig,
    ) -> Self {
        Self {
            id,
            name,
            description,
            engine,
            contexts: HashMap::new(),
            path,
            attributes,
            config,
            clock: 0,
        }
    }

    /// The NPC identity.
    #[must_use]
    pub fn id(&self) -> NpcId {
        self.id
    }

    /// The NPC name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Where the NPC currently stands.
    #[must_use]
    pub fn position(&self) -> Position {
        self.path.current()
    }

    /// A free-form attribute from the definition.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// The dialogue engine.
    #[must_use]
    pub fn engine(&self) -> &DialogueEngine<A> {
        &self.engine
    }

    /// The conversation with an actor, if one exists.
    #[must_use]
    pub fn context(&self, actor: ActorId) -> Option<&ConversationContext> {
        self.contexts.get(&actor).map(|slot| &slot.context)
    }

    /// Installs a context, replacing (and returning) any existing one for
    /// the same actor.
    pub fn insert_context(&mut self, context: ConversationContext) -> Option<ConversationContext> {
        let last_used = self.tick_clock();
        self.contexts
            .insert(context.actor(), Slot { context, last_used })
            .map(|slot| slot.context)
    }

    /// Number of contexts held, dormant or not.
    #[must_use]
    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }

    /// Number of exchanges in progress.
    #[must_use]
    pub fn active_conversations(&self) -> usize {
        self.contexts
            .values()
            .filter(|slot| slot.context.is_engaged())
            .count()
    }

    /// Drops every dormant context and returns how many were dropped.
    pub fn evict_dormant(&mut self) -> usize {
        let before = self.contexts.len();
        self.contexts.retain(|_, slot| !slot.context.is_dormant());
        before - self.contexts.len()
    }

    /// Walks one step along the patrol path unless someone is being
    /// attended. Returns the new position if the NPC moved.
    pub fn tick(&mut self) -> Option<Position> {
        if self.active_conversations() > 0 {
            return None;
        }
        let before = self.path.current();
        let after = self.path.advance();
        (before != after).then_some(after)
    }

    fn tick_clock(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Evicts the least recently used dormant contexts above the limit.
    fn trim_dormant(&mut self) {
        let mut dormant: Vec<(u64, ActorId)> = self
            .contexts
            .iter()
            .filter(|(_, slot)| slot.context.is_dormant())
            .map(|(id, slot)| (slot.last_used, *id))
            .collect();
        if dormant.len() <= self.config.max_dormant_contexts {
            return;
        }
        dormant.sort_unstable();
        let excess = dormant.len() - self.config.max_dormant_contexts;
        for (_, id) in dormant.into_iter().take(excess) {
            self.contexts.remove(&id);
        }
        debug!(npc = %self.name, evicted = excess, "dormant contexts evicted");
    }
}

impl<A: Actor> Npc<A> {
    /// Dispatches one chat line from an actor.
    pub fn talk(&mut self, actor: &mut A, text: &str) -> Reply {
        let span = info_span!("npc", npc = %self.name, actor = %actor.id());
        let _enter = span.enter();

        let last_used = self.tick_clock();
        let initial = self.engine.config().initial_state;
        let slot = self.contexts.entry(actor.id()).or_insert_with(|| Slot {
            context: ConversationContext::new(actor.id(), initial),
            last_used,
        });
        slot.last_used = last_used;
        let reply = self.engine.step(&mut slot.context, text, actor);

        self.trim_dormant();
        reply
    }

    /// Ends an actor's exchange through the abandonment rules.
    ///
    /// Returns `None` if the NPC has no conversation with the actor.
    pub fn abandon(&mut self, actor: &mut A) -> Option<Reply> {
        let span = info_span!("npc", npc = %self.name, actor = %actor.id());
        let _enter = span.enter();

        let slot = self.contexts.get_mut(&actor.id())?;
        let reply = self.engine.abandon(&mut slot.context, actor);
        self.trim_dormant();
        Some(reply)
    }
}

impl<A> std::fmt::Debug for Npc<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Npc")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("position", &self.path.current())
            .field("contexts", &self.contexts.len())
            .finish_non_exhaustive()
    }
}
