//! Actions executed when a rule is selected.
//!
//! An action receives the actor, the sentence, and an [`Exchange`]: the
//! step-local view of the conversation through which it speaks, stashes
//! scratch data, and optionally commits a state transition.

use palaver_foundation::ConversationState;
use palaver_parser::Sentence;
use thiserror::Error;

use crate::actor::Actor;
use crate::context::{ConversationContext, Scratch};

/// Unexpected failure inside an action.
///
/// Domain outcomes (not enough money, unknown offer number) are replies, not
/// errors. This type is for faults the engine must contain and log.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Scratch data the action relies on is missing.
    #[error("missing scratch data: {0}")]
    MissingScratch(&'static str),

    /// A collaborator the action talks to failed.
    #[error("collaborator failure: {0}")]
    Collaborator(String),

    /// The action panicked; the payload message if one was available.
    #[error("action panicked: {0}")]
    Panicked(String),

    /// Any other failure.
    #[error("{0}")]
    Other(String),
}

/// Step-local view of a conversation handed to actions.
pub struct Exchange<'a> {
    context: &'a mut ConversationContext,
    lines: &'a mut Vec<String>,
    committed: Option<ConversationState>,
}

impl<'a> Exchange<'a> {
    pub(crate) fn new(context: &'a mut ConversationContext, lines: &'a mut Vec<String>) -> Self {
        Self {
            context,
            lines,
            committed: None,
        }
    }

    /// Emits an NPC message to the actor.
    pub fn say(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }

    /// Commits a transition, overriding the rule's declared target.
    pub fn set_state(&mut self, state: ConversationState) {
        self.context.transition(state);
        self.committed = Some(state);
    }

    /// The current state (including a transition committed in this step).
    #[must_use]
    pub fn state(&self) -> ConversationState {
        self.context.state()
    }

    /// The state committed by the action so far, if any.
    #[must_use]
    pub fn committed_state(&self) -> Option<ConversationState> {
        self.committed
    }

    /// Read-only access to the conversation context.
    #[must_use]
    pub fn context(&self) -> &ConversationContext {
        self.context
    }

    /// Scratch data kept between steps of this conversation.
    pub fn scratch(&mut self) -> &mut Scratch {
        self.context.scratch_mut()
    }

    /// Messages emitted so far in this step.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        self.lines
    }
}

/// A side effect run when its rule is selected.
pub trait ChatAction<A>: Send + Sync {
    /// Executes the action.
    ///
    /// # Errors
    ///
    /// Returns an [`ActionError`] on an unexpected fault. The engine logs
    /// it and keeps whatever was said or committed before the fault.
    fn fire(
        &self,
        actor: &mut A,
        sentence: &Sentence,
        exchange: &mut Exchange<'_>,
    ) -> Result<(), ActionError>;
}

impl<A, F> ChatAction<A> for F
where
    F: Fn(&mut A, &Sentence, &mut Exchange<'_>) -> Result<(), ActionError> + Send + Sync,
{
    fn fire(
        &self,
        actor: &mut A,
        sentence: &Sentence,
        exchange: &mut Exchange<'_>,
    ) -> Result<(), ActionError> {
        self(actor, sentence, exchange)
    }
}

/// Boxed action as stored in rules.
pub type BoxedAction<A> = Box<dyn ChatAction<A>>;

/// Pins a closure to the action signature so its argument types can be
/// inferred.
pub fn from_fn<A, F>(f: F) -> F
where
    F: Fn(&mut A, &Sentence, &mut Exchange<'_>) -> Result<(), ActionError> + Send + Sync,
{
    f
}

// =============================================================================
// Built-in Actions
// =============================================================================

/// Writes a fixed value into a quest slot.
pub struct SetQuest {
    slot: String,
    value: String,
}

impl SetQuest {
    /// Creates the action.
    #[must_use]
    pub fn new(slot: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            slot: slot.into(),
            value: value.into(),
        }
    }
}

impl<A: Actor> ChatAction<A> for SetQuest {
    fn fire(
        &self,
        actor: &mut A,
        _sentence: &Sentence,
        _exchange: &mut Exchange<'_>,
    ) -> Result<(), ActionError> {
        actor.set_quest(&self.slot, &self.value);
        Ok(())
    }
}

/// Says a fixed line.
pub struct Say(pub String);

impl<A> ChatAction<A> for Say {
    fn fire(
        &self,
        _actor: &mut A,
        _sentence: &Sentence,
        exchange: &mut Exchange<'_>,
    ) -> Result<(), ActionError> {
        exchange.say(self.0.clone());
        Ok(())
    }
}

/// Runs several actions in order, stopping at the first fault.
pub struct MultipleActions<A> {
    actions: Vec<BoxedAction<A>>,
}

impl<A> MultipleActions<A> {
    /// Creates the sequence.
    #[must_use]
    pub fn new(actions: Vec<BoxedAction<A>>) -> Self {
        Self { actions }
    }
}

impl<A> ChatAction<A> for MultipleActions<A> {
    fn fire(
        &self,
        actor: &mut A,
        sentence: &Sentence,
        exchange: &mut Exchange<'_>,
    ) -> Result<(), ActionError> {
        for action in &self.actions {
            action.fire(actor, sentence, exchange)?;
        }
        Ok(())
    }
}
