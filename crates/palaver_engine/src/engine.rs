//! The dispatch engine.
//!
//! One [`DialogueEngine::step`] consumes one chat line:
//!
//! 1. normalize the text into a [`Sentence`]
//! 2. look up candidates for (current state, primary phrase)
//! 3. select the first candidate whose condition holds
//! 4. emit its reply, then run its action
//! 5. apply the rule's target unless the action committed a state
//!
//! Nothing escapes a step, not even a panic. Action faults and panics are
//! logged and reported in [`StepOutcome::Faulted`]; output
//! produced before the fault is kept and the state only changes if the
//! action had already committed a transition.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use palaver_foundation::{ActorId, ConversationState, Result};
use palaver_parser::{Sentence, SentenceNormalizer};
use tracing::{debug, error, trace, warn};

use crate::action::{ActionError, Exchange};
use crate::config::EngineConfig;
use crate::context::ConversationContext;
use crate::rule::{Rule, RuleId};
use crate::table::TriggerTable;

// =============================================================================
// Step Results
// =============================================================================

/// What a dispatch step did.
#[derive(Debug)]
pub enum StepOutcome {
    /// No rule matched; nothing ran and the state is unchanged.
    NoMatch,
    /// A rule fired.
    Fired {
        /// The selected rule
        rule: RuleId,
        /// State before the step
        from: ConversationState,
        /// State after the step
        to: ConversationState,
    },
    /// A condition or action of the selected rule faulted.
    Faulted {
        /// The rule whose condition or action failed
        rule: RuleId,
        /// The failure
        error: ActionError,
    },
}

/// The actor-visible result of a step.
#[derive(Debug)]
pub struct Reply {
    lines: Vec<String>,
    outcome: StepOutcome,
}

impl Reply {
    fn new(lines: Vec<String>, outcome: StepOutcome) -> Self {
        Self { lines, outcome }
    }

    /// Messages in the order they were emitted.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// All messages joined by newlines (empty for silence).
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Returns true if nothing was said.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// What happened during the step.
    #[must_use]
    pub fn outcome(&self) -> &StepOutcome {
        &self.outcome
    }

    /// The rule that fired (or faulted), if any.
    #[must_use]
    pub fn rule(&self) -> Option<RuleId> {
        match self.outcome {
            StepOutcome::NoMatch => None,
            StepOutcome::Fired { rule, .. } | StepOutcome::Faulted { rule, .. } => Some(rule),
        }
    }

    /// Returns true if the step faulted.
    #[must_use]
    pub fn is_fault(&self) -> bool {
        matches!(self.outcome, StepOutcome::Faulted { .. })
    }

    /// Consumes the reply, returning its messages.
    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

// =============================================================================
// Dialogue Engine
// =============================================================================

/// Matches chat lines against a trigger table and drives contexts.
///
/// Dispatch borrows the engine immutably, so one engine can serve many
/// contexts at once. A context itself is advanced through `&mut`, which
/// serializes the steps of one conversation.
pub struct DialogueEngine<A> {
    table: TriggerTable<A>,
    config: EngineConfig,
}

impl<A> DialogueEngine<A> {
    /// Creates an engine with the standard vocabulary.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_normalizer(SentenceNormalizer::standard(), config)
    }

    /// Creates an engine over a custom normalizer.
    #[must_use]
    pub fn with_normalizer(normalizer: SentenceNormalizer, config: EngineConfig) -> Self {
        Self {
            table: TriggerTable::new(normalizer).with_reject_conflicts(config.reject_conflicts),
            config,
        }
    }

    /// Registers a rule.
    ///
    /// # Errors
    ///
    /// See [`TriggerTable::register`].
    pub fn register(&mut self, rule: Rule<A>) -> Result<RuleId> {
        self.table.register(rule)
    }

    /// The rule table.
    #[must_use]
    pub fn table(&self) -> &TriggerTable<A> {
        &self.table
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The normalizer applied to chat lines.
    #[must_use]
    pub fn normalizer(&self) -> &SentenceNormalizer {
        self.table.normalizer()
    }

    /// Creates a fresh context for an actor.
    #[must_use]
    pub fn new_context(&self, actor: ActorId) -> ConversationContext {
        ConversationContext::new(actor, self.config.initial_state)
    }

    /// Normalizes and dispatches one chat line.
    pub fn step(&self, context: &mut ConversationContext, raw: &str, actor: &mut A) -> Reply {
        let sentence = self.normalizer().normalize(raw);
        self.dispatch(context, &sentence, actor)
    }

    /// Dispatches an already normalized sentence.
    pub fn dispatch(
        &self,
        context: &mut ConversationContext,
        sentence: &Sentence,
        actor: &mut A,
    ) -> Reply {
        let state = context.state();
        let phrase = sentence.primary_phrase();
        if let Some(message) = sentence.error_message() {
            debug!(?state, phrase, error = message, "dispatching sentence with parse error");
        }

        let candidates = self.table.lookup(state, phrase);
        match Self::select(&candidates, actor, sentence, context) {
            Ok(Some(rule)) => {
                debug!(?state, phrase, %rule, "rule selected");
                Self::fire(rule, context, sentence, actor, true)
            }
            Ok(None) => {
                trace!(?state, phrase, candidates = candidates.len(), "no rule matched");
                let lines = self.config.fallback_reply.iter().cloned().collect();
                Reply::new(lines, StepOutcome::NoMatch)
            }
            Err((rule, err)) => {
                error!(?state, phrase, %rule, error = %err, "condition faulted");
                Reply::new(
                    Vec::new(),
                    StepOutcome::Faulted {
                        rule: rule.id.unwrap_or(RuleId(0)),
                        error: err,
                    },
                )
            }
        }
    }

    /// Ends the exchange on a supervisor's request.
    ///
    /// The first satisfied abandonment rule of the current state runs like
    /// any other rule; afterwards the context is forced back to its initial
    /// state and its scratch data is dropped.
    pub fn abandon(&self, context: &mut ConversationContext, actor: &mut A) -> Reply {
        let state = context.state();
        let sentence = Sentence::new("", Vec::new());
        let candidates = self.table.lookup_abandon(state);

        let reply = match Self::select(&candidates, actor, &sentence, context) {
            Ok(Some(rule)) => Self::fire(rule, context, &sentence, actor, false),
            Ok(None) => Reply::new(Vec::new(), StepOutcome::NoMatch),
            Err((rule, err)) => {
                error!(?state, %rule, error = %err, "abandonment condition faulted");
                Reply::new(
                    Vec::new(),
                    StepOutcome::Faulted {
                        rule: rule.id.unwrap_or(RuleId(0)),
                        error: err,
                    },
                )
            }
        };

        context.reset();
        if state != context.state() {
            warn!(actor = %context.actor(), from = ?state, "conversation abandoned");
        }
        match reply.outcome {
            StepOutcome::Fired { rule, from, .. } => Reply::new(
                reply.lines,
                StepOutcome::Fired {
                    rule,
                    from,
                    to: context.state(),
                },
            ),
            _ => reply,
        }
    }

    fn select<'r>(
        candidates: &[&'r Rule<A>],
        actor: &A,
        sentence: &Sentence,
        context: &ConversationContext,
    ) -> std::result::Result<Option<&'r Rule<A>>, (&'r Rule<A>, ActionError)> {
        for &rule in candidates {
            let Some(condition) = &rule.condition else {
                return Ok(Some(rule));
            };
            match guard(|| Ok(condition.fire(actor, sentence, context))) {
                Ok(true) => return Ok(Some(rule)),
                Ok(false) => {}
                Err(err) => return Err((rule, err)),
            }
        }
        Ok(None)
    }

    fn fire(
        rule: &Rule<A>,
        context: &mut ConversationContext,
        sentence: &Sentence,
        actor: &mut A,
        apply_target: bool,
    ) -> Reply {
        let from = context.state();
        let id = rule.id.unwrap_or(RuleId(0));
        let mut lines = Vec::new();
        if let Some(reply) = &rule.reply {
            lines.push(reply.clone());
        }

        let mut committed = None;
        let mut fault = None;
        if let Some(action) = &rule.action {
            let mut exchange = Exchange::new(context, &mut lines);
            let result = guard(|| action.fire(actor, sentence, &mut exchange));
            committed = exchange.committed_state();
            fault = result.err();
        }
        context.record_step();

        if let Some(err) = fault {
            error!(
                from = ?from,
                rule = %rule,
                committed = ?committed,
                error = %err,
                "action faulted"
            );
            return Reply::new(lines, StepOutcome::Faulted { rule: id, error: err });
        }

        if apply_target && committed.is_none() {
            if let Some(target) = rule.target {
                context.transition(target);
            }
        }

        Reply::new(
            lines,
            StepOutcome::Fired {
                rule: id,
                from,
                to: context.state(),
            },
        )
    }
}

impl<A> Default for DialogueEngine<A> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<A> std::fmt::Debug for DialogueEngine<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogueEngine")
            .field("table", &self.table)
            .field("config", &self.config)
            .finish()
    }
}

/// Runs a condition or action, turning a panic into a fault.
fn guard<T>(
    f: impl FnOnce() -> std::result::Result<T, ActionError>,
) -> std::result::Result<T, ActionError> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(ActionError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
