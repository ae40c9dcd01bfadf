//! Registration helpers for dialogue content.
//!
//! [`DialogueBuilder`] wraps an engine during NPC construction. Besides the
//! positional [`DialogueBuilder::add`] it offers the shortcuts most NPCs are
//! written with: a greeting, a goodbye, and canned replies to the standard
//! questions. Helpers register in order, so rules added before a helper take
//! precedence over it.

use palaver_foundation::{ConversationState, Result};

use crate::action::BoxedAction;
use crate::condition::BoxedCondition;
use crate::engine::DialogueEngine;
use crate::phrases;
use crate::rule::{Rule, RuleId, Trigger};

/// Registers rules into an engine.
pub struct DialogueBuilder<'e, A> {
    engine: &'e mut DialogueEngine<A>,
    registered: Vec<RuleId>,
}

impl<'e, A> DialogueBuilder<'e, A> {
    /// Wraps an engine.
    pub fn new(engine: &'e mut DialogueEngine<A>) -> Self {
        Self {
            engine,
            registered: Vec::new(),
        }
    }

    /// The state contexts start in.
    #[must_use]
    pub fn initial_state(&self) -> ConversationState {
        self.engine.config().initial_state
    }

    /// Rules registered through this builder, in order.
    #[must_use]
    pub fn registered(&self) -> &[RuleId] {
        &self.registered
    }

    /// Registers a fully built rule.
    ///
    /// # Errors
    ///
    /// Returns the registration error of the underlying table.
    pub fn add_rule(&mut self, rule: Rule<A>) -> Result<RuleId> {
        let id = self.engine.register(rule)?;
        self.registered.push(id);
        Ok(id)
    }

    /// Registers a rule from positional parts.
    ///
    /// # Errors
    ///
    /// Returns the registration error of the underlying table.
    pub fn add(
        &mut self,
        state: ConversationState,
        trigger: impl Into<Trigger>,
        condition: Option<BoxedCondition<A>>,
        target: Option<ConversationState>,
        reply: Option<&str>,
        action: Option<BoxedAction<A>>,
    ) -> Result<RuleId> {
        let mut rule = Rule::new(state, trigger)
            .with_boxed_condition(condition)
            .with_boxed_action(action);
        if let Some(target) = target {
            rule = rule.with_target(target);
        }
        if let Some(reply) = reply {
            rule = rule.with_reply(reply);
        }
        self.add_rule(rule)
    }

    /// Greets from the initial state (or while attending) and starts
    /// attending.
    ///
    /// # Errors
    ///
    /// Returns the registration error of the underlying table.
    pub fn add_greeting(&mut self, text: &str) -> Result<()> {
        let initial = self.initial_state();
        let mut states = vec![initial];
        if initial != ConversationState::ATTENDING {
            states.push(ConversationState::ATTENDING);
        }
        for state in states {
            self.add_rule(
                Rule::new(state, phrases::GREETING)
                    .with_reply(text)
                    .with_target(ConversationState::ATTENDING)
                    .with_label("greeting"),
            )?;
        }
        Ok(())
    }

    /// Replies to a trigger while attending.
    ///
    /// # Errors
    ///
    /// Returns the registration error of the underlying table.
    pub fn add_reply(&mut self, trigger: impl Into<Trigger>, text: &str) -> Result<RuleId> {
        self.add_rule(
            Rule::new(ConversationState::ATTENDING, trigger)
                .with_reply(text)
                .with_target(ConversationState::ATTENDING),
        )
    }

    /// Replies to questions about the NPC's job.
    ///
    /// # Errors
    ///
    /// Returns the registration error of the underlying table.
    pub fn add_job(&mut self, text: &str) -> Result<RuleId> {
        self.add_reply(phrases::JOB, text)
    }

    /// Replies to requests for help.
    ///
    /// # Errors
    ///
    /// Returns the registration error of the underlying table.
    pub fn add_help(&mut self, text: &str) -> Result<RuleId> {
        self.add_reply(phrases::HELP, text)
    }

    /// Replies to questions about what the NPC offers.
    ///
    /// # Errors
    ///
    /// Returns the registration error of the underlying table.
    pub fn add_offer(&mut self, text: &str) -> Result<RuleId> {
        self.add_reply(phrases::OFFER, text)
    }

    /// Replies to quest requests.
    ///
    /// # Errors
    ///
    /// Returns the registration error of the underlying table.
    pub fn add_quest(&mut self, text: &str) -> Result<RuleId> {
        self.add_reply(phrases::QUEST, text)
    }

    /// Says goodbye from every reserved engaged state and returns to the
    /// initial state. The same text is said when an engaged exchange is
    /// abandoned.
    ///
    /// Goodbye phrases and abandonment already owned by an unconditional
    /// rule of a state are left to that rule. States interned through a
    /// [`palaver_foundation::StateRegistry`] are not covered; use
    /// [`DialogueBuilder::add_goodbye_in`] for those.
    ///
    /// # Errors
    ///
    /// Returns the registration error of the underlying table.
    pub fn add_goodbye(&mut self, text: &str) -> Result<()> {
        self.add_goodbye_in(text, &[])
    }

    /// Like [`DialogueBuilder::add_goodbye`], also covering application
    /// defined states.
    ///
    /// # Errors
    ///
    /// Returns the registration error of the underlying table.
    pub fn add_goodbye_in(&mut self, text: &str, extra: &[ConversationState]) -> Result<()> {
        let initial = self.initial_state();
        let mut states: Vec<ConversationState> = Vec::new();
        for &state in ConversationState::ENGAGED.iter().chain(extra) {
            if state != initial && !states.contains(&state) {
                states.push(state);
            }
        }

        for state in states {
            let free: Vec<&str> = phrases::GOODBYE
                .iter()
                .copied()
                .filter(|phrase| !self.owns(state, Some(*phrase)))
                .collect();
            if !free.is_empty() {
                self.add_rule(
                    Rule::new(state, free.as_slice())
                        .with_reply(text)
                        .with_target(initial)
                        .with_label("goodbye"),
                )?;
            }
            if !self.owns(state, None) {
                self.add_rule(
                    Rule::new(state, Trigger::Abandon)
                        .with_reply(text)
                        .with_label("goodbye"),
                )?;
            }
        }
        Ok(())
    }

    /// Returns true if an unconditional rule already answers the phrase
    /// (or abandonment, for `None`) in a state.
    fn owns(&self, state: ConversationState, phrase: Option<&str>) -> bool {
        let table = self.engine.table();
        let rules = match phrase {
            Some(phrase) => table.lookup(state, phrase),
            None => table.lookup_abandon(state),
        };
        rules
            .iter()
            .any(|rule| !rule.is_conditional() && *rule.trigger() != Trigger::Any)
    }
}
