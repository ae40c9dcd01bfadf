//! Conditions gating rule selection.
//!
//! A condition is a pure predicate over the actor, the sentence, and the
//! conversation context. Closures with the right signature are conditions,
//! and the structs here cover the common quest-slot checks.

use palaver_parser::Sentence;

use crate::actor::Actor;
use crate::context::ConversationContext;

/// A predicate evaluated while choosing among candidate rules.
pub trait ChatCondition<A>: Send + Sync {
    /// Returns true if the rule may fire.
    fn fire(&self, actor: &A, sentence: &Sentence, context: &ConversationContext) -> bool;
}

impl<A, F> ChatCondition<A> for F
where
    F: Fn(&A, &Sentence, &ConversationContext) -> bool + Send + Sync,
{
    fn fire(&self, actor: &A, sentence: &Sentence, context: &ConversationContext) -> bool {
        self(actor, sentence, context)
    }
}

/// Boxed condition as stored in rules.
pub type BoxedCondition<A> = Box<dyn ChatCondition<A>>;

/// Pins a closure to the condition signature so its argument types can be
/// inferred.
pub fn from_fn<A, F>(f: F) -> F
where
    F: Fn(&A, &Sentence, &ConversationContext) -> bool + Send + Sync,
{
    f
}

// =============================================================================
// Combinators
// =============================================================================

/// True if every inner condition is true (and true when empty).
pub struct AndCondition<A> {
    conditions: Vec<BoxedCondition<A>>,
}

impl<A> AndCondition<A> {
    /// Creates a conjunction.
    #[must_use]
    pub fn new(conditions: Vec<BoxedCondition<A>>) -> Self {
        Self { conditions }
    }
}

impl<A> ChatCondition<A> for AndCondition<A> {
    fn fire(&self, actor: &A, sentence: &Sentence, context: &ConversationContext) -> bool {
        self.conditions
            .iter()
            .all(|c| c.fire(actor, sentence, context))
    }
}

/// True if any inner condition is true.
pub struct OrCondition<A> {
    conditions: Vec<BoxedCondition<A>>,
}

impl<A> OrCondition<A> {
    /// Creates a disjunction.
    #[must_use]
    pub fn new(conditions: Vec<BoxedCondition<A>>) -> Self {
        Self { conditions }
    }
}

impl<A> ChatCondition<A> for OrCondition<A> {
    fn fire(&self, actor: &A, sentence: &Sentence, context: &ConversationContext) -> bool {
        self.conditions
            .iter()
            .any(|c| c.fire(actor, sentence, context))
    }
}

/// Negation of the inner condition.
pub struct NotCondition<A> {
    inner: BoxedCondition<A>,
}

impl<A> NotCondition<A> {
    /// Creates a negation.
    #[must_use]
    pub fn new(inner: BoxedCondition<A>) -> Self {
        Self { inner }
    }
}

impl<A> ChatCondition<A> for NotCondition<A> {
    fn fire(&self, actor: &A, sentence: &Sentence, context: &ConversationContext) -> bool {
        !self.inner.fire(actor, sentence, context)
    }
}

// =============================================================================
// Quest Slot Conditions
// =============================================================================

/// The slot was never written, or holds `"rejected"`.
pub struct QuestNotStarted {
    slot: String,
}

impl QuestNotStarted {
    /// Creates the condition for a slot.
    #[must_use]
    pub fn new(slot: impl Into<String>) -> Self {
        Self { slot: slot.into() }
    }
}

impl<A: Actor> ChatCondition<A> for QuestNotStarted {
    fn fire(&self, actor: &A, _sentence: &Sentence, _context: &ConversationContext) -> bool {
        matches!(actor.quest(&self.slot), None | Some("rejected"))
    }
}

/// The first `;`-separated part of the slot equals a value.
pub struct QuestInState {
    slot: String,
    value: String,
}

impl QuestInState {
    /// Creates the condition for a slot and expected state.
    #[must_use]
    pub fn new(slot: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            slot: slot.into(),
            value: value.into(),
        }
    }
}

impl<A: Actor> ChatCondition<A> for QuestInState {
    fn fire(&self, actor: &A, _sentence: &Sentence, _context: &ConversationContext) -> bool {
        actor.quest_part(&self.slot, 0) == Some(self.value.as_str())
    }
}

/// The slot value starts with a prefix.
pub struct QuestStartsWith {
    slot: String,
    prefix: String,
}

impl QuestStartsWith {
    /// Creates the condition for a slot and prefix.
    #[must_use]
    pub fn new(slot: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            slot: slot.into(),
            prefix: prefix.into(),
        }
    }
}

impl<A: Actor> ChatCondition<A> for QuestStartsWith {
    fn fire(&self, actor: &A, _sentence: &Sentence, _context: &ConversationContext) -> bool {
        actor
            .quest(&self.slot)
            .is_some_and(|v| v.starts_with(&self.prefix))
    }
}

/// The slot is written and is neither `"rejected"` nor `"done"`-prefixed.
pub struct QuestActive {
    slot: String,
}

impl QuestActive {
    /// Creates the condition for a slot.
    #[must_use]
    pub fn new(slot: impl Into<String>) -> Self {
        Self { slot: slot.into() }
    }
}

impl<A: Actor> ChatCondition<A> for QuestActive {
    fn fire(&self, actor: &A, _sentence: &Sentence, _context: &ConversationContext) -> bool {
        actor
            .quest(&self.slot)
            .is_some_and(|v| v != "rejected" && !v.starts_with("done"))
    }
}

/// The sentence carries a normalization error.
pub struct SentenceHasError;

impl<A> ChatCondition<A> for SentenceHasError {
    fn fire(&self, _actor: &A, sentence: &Sentence, _context: &ConversationContext) -> bool {
        sentence.has_error()
    }
}
