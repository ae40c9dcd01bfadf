//! Conversation state identifiers.
//!
//! A [`ConversationState`] is an opaque, comparable symbol naming the phase of
//! an NPC-player exchange. The engine never interprets states; it only stores,
//! compares, and hashes them. A small set of conventional states is reserved
//! with fixed indices, and applications intern their own through a
//! [`StateRegistry`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Interned conversation state.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConversationState(pub(crate) u32);

impl ConversationState {
    /// Returns the raw index of this state.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    /// Returns true if this is one of the reserved states.
    #[must_use]
    pub const fn is_reserved(self) -> bool {
        (self.0 as usize) < StateRegistry::RESERVED_STATES.len()
    }

    /// Returns the name of a reserved state, or `None` for interned ones.
    #[must_use]
    pub fn reserved_name(self) -> Option<&'static str> {
        StateRegistry::RESERVED_STATES.get(self.0 as usize).copied()
    }

    // =========================================================================
    // Reserved States
    // =========================================================================
    // These are always interned at startup with fixed indices.

    /// Nobody is being attended; the conversation has not started or has ended.
    pub const IDLE: ConversationState = ConversationState(0);

    /// The NPC is listening to the player.
    pub const ATTENDING: ConversationState = ConversationState(1);

    /// The NPC has offered a quest and waits for yes/no.
    pub const QUEST_OFFERED: ConversationState = ConversationState(2);

    /// The player appears to carry the quest item; the NPC asked about it.
    pub const QUEST_ITEM_BROUGHT: ConversationState = ConversationState(3);

    /// The NPC asked a quest-specific question about an item.
    pub const QUEST_ITEM_QUESTION: ConversationState = ConversationState(4);

    /// The NPC offered a service (e.g. prolonging a market offer).
    pub const SERVICE_OFFERED: ConversationState = ConversationState(5);

    /// The NPC quoted a price for something the player wants to buy.
    pub const BUY_PRICE_OFFERED: ConversationState = ConversationState(6);

    /// The NPC quoted a price for something the player wants to sell.
    pub const SELL_PRICE_OFFERED: ConversationState = ConversationState(7);

    /// Generic question state.
    pub const QUESTION_1: ConversationState = ConversationState(8);

    /// Generic question state.
    pub const QUESTION_2: ConversationState = ConversationState(9);

    /// Generic question state.
    pub const QUESTION_3: ConversationState = ConversationState(10);

    /// Generic information state.
    pub const INFORMATION_1: ConversationState = ConversationState(11);

    /// Generic information state.
    pub const INFORMATION_2: ConversationState = ConversationState(12);

    /// Generic information state.
    pub const INFORMATION_3: ConversationState = ConversationState(13);

    /// Every reserved state in which the NPC is engaged with a player.
    pub const ENGAGED: &'static [ConversationState] = &[
        Self::ATTENDING,
        Self::QUEST_OFFERED,
        Self::QUEST_ITEM_BROUGHT,
        Self::QUEST_ITEM_QUESTION,
        Self::SERVICE_OFFERED,
        Self::BUY_PRICE_OFFERED,
        Self::SELL_PRICE_OFFERED,
        Self::QUESTION_1,
        Self::QUESTION_2,
        Self::QUESTION_3,
        Self::INFORMATION_1,
        Self::INFORMATION_2,
        Self::INFORMATION_3,
    ];
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::IDLE
    }
}

impl fmt::Debug for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reserved_name() {
            Some(name) => write!(f, "ConversationState({name})"),
            None => write!(f, "ConversationState(#{})", self.0),
        }
    }
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reserved_name() {
            Some(name) => f.write_str(name),
            None => write!(f, "state#{}", self.0),
        }
    }
}

/// Interner for application-defined conversation states.
///
/// Names are case-insensitive and stored upper-cased. It is not thread-safe;
/// build it once while loading content and share it read-only afterwards.
#[derive(Clone, Debug)]
pub struct StateRegistry {
    /// Name storage, indexed by state.
    names: Vec<Arc<str>>,
    /// Map from name to state.
    by_name: HashMap<Arc<str>, ConversationState>,
}

impl StateRegistry {
    /// Reserved states that are pre-interned at startup.
    const RESERVED_STATES: &'static [&'static str] = &[
        "IDLE",                // 0
        "ATTENDING",           // 1
        "QUEST_OFFERED",       // 2
        "QUEST_ITEM_BROUGHT",  // 3
        "QUEST_ITEM_QUESTION", // 4
        "SERVICE_OFFERED",     // 5
        "BUY_PRICE_OFFERED",   // 6
        "SELL_PRICE_OFFERED",  // 7
        "QUESTION_1",          // 8
        "QUESTION_2",          // 9
        "QUESTION_3",          // 10
        "INFORMATION_1",       // 11
        "INFORMATION_2",       // 12
        "INFORMATION_3",       // 13
    ];

    /// Creates a registry with the reserved states pre-interned.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            names: Vec::new(),
            by_name: HashMap::new(),
        };

        for (i, &name) in Self::RESERVED_STATES.iter().enumerate() {
            let state = registry.intern(name);
            debug_assert_eq!(
                state.0 as usize, i,
                "Reserved state '{name}' should have index {i}, got {}",
                state.0
            );
        }

        registry
    }

    /// Interns a state name, returning its [`ConversationState`].
    ///
    /// # Panics
    ///
    /// Panics if the number of interned states exceeds `u32::MAX`.
    pub fn intern(&mut self, name: &str) -> ConversationState {
        let key = name.trim().to_uppercase();
        if let Some(&state) = self.by_name.get(key.as_str()) {
            return state;
        }

        let index = u32::try_from(self.names.len()).expect("too many conversation states");
        let state = ConversationState(index);
        let arc: Arc<str> = key.into();
        self.names.push(arc.clone());
        self.by_name.insert(arc, state);
        state
    }

    /// Looks up a previously interned state by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ConversationState> {
        self.by_name.get(name.trim().to_uppercase().as_str()).copied()
    }

    /// Looks up a state by name, failing if it was never interned.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ErrorKind::UnknownState`] if the name is not known.
    pub fn resolve(&self, name: &str) -> Result<ConversationState> {
        self.get(name)
            .ok_or_else(|| Error::unknown_state(name.to_string()))
    }

    /// Returns the name of a state, if it belongs to this registry.
    #[must_use]
    pub fn name(&self, state: ConversationState) -> Option<&str> {
        self.names.get(state.0 as usize).map(AsRef::as_ref)
    }

    /// Returns the number of interned states, reserved ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false: the reserved states are present from construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for StateRegistry {
    fn default() -> Self {
        Self::new()
    }
}
