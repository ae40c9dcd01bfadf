//! Rules: the unit of dialogue registration.

use std::fmt;

use palaver_foundation::ConversationState;

use crate::action::{BoxedAction, ChatAction};
use crate::condition::{BoxedCondition, ChatCondition};

// =============================================================================
// Rule Identity
// =============================================================================

/// Position of a rule in its table's registration order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(pub(crate) u32);

impl RuleId {
    /// Returns the registration index.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RuleId({})", self.0)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule#{}", self.0)
    }
}

// =============================================================================
// Trigger
// =============================================================================

/// What a rule listens for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// A set of synonymous phrases; canonicalized at registration
    Phrases(Vec<String>),
    /// Any primary phrase, consulted after phrase-specific rules
    Any,
    /// The abandonment signal sent by a supervisor, never a chat line
    Abandon,
}

impl Trigger {
    /// A single phrase.
    #[must_use]
    pub fn phrase(phrase: impl Into<String>) -> Self {
        Self::Phrases(vec![phrase.into()])
    }

    /// A set of synonyms.
    #[must_use]
    pub fn phrases<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Phrases(phrases.into_iter().map(Into::into).collect())
    }

    /// The wildcard trigger.
    #[must_use]
    pub fn any() -> Self {
        Self::Any
    }

    /// The abandonment trigger.
    #[must_use]
    pub fn abandon() -> Self {
        Self::Abandon
    }
}

impl From<&str> for Trigger {
    fn from(phrase: &str) -> Self {
        Self::phrase(phrase)
    }
}

impl From<&[&str]> for Trigger {
    fn from(phrases: &[&str]) -> Self {
        Self::phrases(phrases.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for Trigger {
    fn from(phrases: [&str; N]) -> Self {
        Self::phrases(phrases)
    }
}

// =============================================================================
// Rule
// =============================================================================

/// A registered (state, trigger, condition, reply, action, target) tuple.
pub struct Rule<A> {
    pub(crate) id: Option<RuleId>,
    pub(crate) state: ConversationState,
    pub(crate) trigger: Trigger,
    pub(crate) condition: Option<BoxedCondition<A>>,
    pub(crate) reply: Option<String>,
    pub(crate) action: Option<BoxedAction<A>>,
    pub(crate) target: Option<ConversationState>,
    pub(crate) label: Option<String>,
}

impl<A> Rule<A> {
    /// Creates a rule with no condition, reply, action or target.
    ///
    /// At least a reply or an action must be added before registration.
    #[must_use]
    pub fn new(state: ConversationState, trigger: impl Into<Trigger>) -> Self {
        Self {
            id: None,
            state,
            trigger: trigger.into(),
            condition: None,
            reply: None,
            action: None,
            target: None,
            label: None,
        }
    }

    /// Sets the condition.
    #[must_use]
    pub fn with_condition(mut self, condition: impl ChatCondition<A> + 'static) -> Self {
        self.condition = Some(Box::new(condition));
        self
    }

    /// Sets an already boxed condition.
    #[must_use]
    pub fn with_boxed_condition(mut self, condition: Option<BoxedCondition<A>>) -> Self {
        self.condition = condition;
        self
    }

    /// Sets the reply text.
    #[must_use]
    pub fn with_reply(mut self, reply: impl Into<String>) -> Self {
        self.reply = Some(reply.into());
        self
    }

    /// Sets the action.
    #[must_use]
    pub fn with_action(mut self, action: impl ChatAction<A> + 'static) -> Self {
        self.action = Some(Box::new(action));
        self
    }

    /// Sets an already boxed action.
    #[must_use]
    pub fn with_boxed_action(mut self, action: Option<BoxedAction<A>>) -> Self {
        self.action = action;
        self
    }

    /// Sets the target state.
    #[must_use]
    pub fn with_target(mut self, target: ConversationState) -> Self {
        self.target = Some(target);
        self
    }

    /// Sets a label used in logs.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The identifier assigned at registration.
    #[must_use]
    pub fn id(&self) -> Option<RuleId> {
        self.id
    }

    /// The state this rule is scoped to.
    #[must_use]
    pub fn state(&self) -> ConversationState {
        self.state
    }

    /// The trigger (canonical after registration).
    #[must_use]
    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    /// The reply text.
    #[must_use]
    pub fn reply(&self) -> Option<&str> {
        self.reply.as_deref()
    }

    /// The declared target state.
    #[must_use]
    pub fn target(&self) -> Option<ConversationState> {
        self.target
    }

    /// The label.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns true if a condition gates this rule.
    #[must_use]
    pub fn is_conditional(&self) -> bool {
        self.condition.is_some()
    }

    /// Returns true if an action is attached.
    #[must_use]
    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }
}

impl<A> fmt::Debug for Rule<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("trigger", &self.trigger)
            .field("conditional", &self.condition.is_some())
            .field("reply", &self.reply)
            .field("action", &self.action.is_some())
            .field("target", &self.target)
            .field("label", &self.label)
            .finish()
    }
}

impl<A> fmt::Display for Rule<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.label, self.id) {
            (Some(label), _) => f.write_str(label),
            (None, Some(id)) => write!(f, "{id}"),
            (None, None) => f.write_str("unregistered rule"),
        }
    }
}
