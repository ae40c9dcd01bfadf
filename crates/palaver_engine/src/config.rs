//! Configuration for dialogue engines and NPCs.

use palaver_foundation::ConversationState;

/// Configuration for a [`crate::DialogueEngine`].
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// State new contexts start in and abandonment returns to.
    pub initial_state: ConversationState,

    /// Reject a second unconditional rule on the same (state, phrase) key
    /// instead of only warning about it.
    pub reject_conflicts: bool,

    /// Reply emitted when no rule matches (None = silence).
    pub fallback_reply: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_state: ConversationState::IDLE,
            reject_conflicts: true,
            fallback_reply: None,
        }
    }
}

impl EngineConfig {
    /// Configuration for authoring new content: conflicts are errors.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            reject_conflicts: true,
            ..Self::default()
        }
    }

    /// Configuration for a live server: conflicts only warn.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            reject_conflicts: false,
            ..Self::default()
        }
    }

    /// Builder method to set the initial state.
    #[must_use]
    pub fn with_initial_state(mut self, state: ConversationState) -> Self {
        self.initial_state = state;
        self
    }

    /// Builder method to set conflict rejection.
    #[must_use]
    pub fn with_reject_conflicts(mut self, reject: bool) -> Self {
        self.reject_conflicts = reject;
        self
    }

    /// Builder method to set the fallback reply.
    #[must_use]
    pub fn with_fallback_reply(mut self, reply: impl Into<String>) -> Self {
        self.fallback_reply = Some(reply.into());
        self
    }
}

/// Configuration for an [`crate::Npc`].
#[derive(Clone, Debug)]
pub struct NpcConfig {
    /// Dormant contexts kept before the oldest are evicted.
    pub max_dormant_contexts: usize,
}

impl Default for NpcConfig {
    fn default() -> Self {
        Self {
            max_dormant_contexts: 64,
        }
    }
}

impl NpcConfig {
    /// Builder method to set the dormant context threshold.
    #[must_use]
    pub fn with_max_dormant_contexts(mut self, max: usize) -> Self {
        self.max_dormant_contexts = max;
        self
    }
}
