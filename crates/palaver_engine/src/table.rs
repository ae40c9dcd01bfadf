//! The trigger table: rules indexed by (state, canonical phrase).
//!
//! Registration order is significant. [`TriggerTable::lookup`] returns the
//! rules keyed to the exact phrase in the order they were registered,
//! followed by the wildcard rules of the state. Every phrase of a synonym set
//! indexes the same rule, so synonyms can never diverge.

use std::collections::HashMap;

use palaver_foundation::{ConversationState, Error, Result};
use palaver_parser::SentenceNormalizer;
use tracing::warn;

use crate::rule::{Rule, RuleId, Trigger};

/// Index key inside one state.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Key {
    Phrase(String),
    Any,
    Abandon,
}

impl Key {
    fn describe(&self) -> &str {
        match self {
            Key::Phrase(phrase) => phrase,
            Key::Any => "*",
            Key::Abandon => "<abandon>",
        }
    }
}

/// Indexed collection of rules.
pub struct TriggerTable<A> {
    normalizer: SentenceNormalizer,
    rules: Vec<Rule<A>>,
    index: HashMap<(ConversationState, Key), Vec<RuleId>>,
    reject_conflicts: bool,
}

impl<A> TriggerTable<A> {
    /// Creates an empty table canonicalizing triggers with `normalizer`.
    #[must_use]
    pub fn new(normalizer: SentenceNormalizer) -> Self {
        Self {
            normalizer,
            rules: Vec::new(),
            index: HashMap::new(),
            reject_conflicts: true,
        }
    }

    /// Sets whether a second unconditional rule on one key is an error.
    #[must_use]
    pub fn with_reject_conflicts(mut self, reject: bool) -> Self {
        self.reject_conflicts = reject;
        self
    }

    /// The normalizer used for trigger phrases.
    #[must_use]
    pub fn normalizer(&self) -> &SentenceNormalizer {
        &self.normalizer
    }

    /// Registers a rule and returns its identifier.
    ///
    /// Registration is atomic: on error the table is unchanged.
    ///
    /// # Errors
    ///
    /// - `MissingResponse` if the rule has neither reply nor action
    /// - `EmptyTriggerSet` if a phrase trigger lists no phrases
    /// - `InvalidTrigger` if a phrase does not canonicalize to one expression
    /// - `ConflictingRule` if the rule is unconditional and an unconditional
    ///   rule already owns one of its keys (when conflicts are rejected)
    pub fn register(&mut self, mut rule: Rule<A>) -> Result<RuleId> {
        if rule.reply.is_none() && rule.action.is_none() {
            return Err(Error::missing_response(rule.state));
        }

        let keys = match &rule.trigger {
            Trigger::Phrases(phrases) => {
                if phrases.is_empty() {
                    return Err(Error::empty_trigger_set(rule.state));
                }
                let mut canonical: Vec<String> = Vec::with_capacity(phrases.len());
                for phrase in phrases {
                    let phrase = self.normalizer.canonical_trigger(phrase)?;
                    if !canonical.contains(&phrase) {
                        canonical.push(phrase);
                    }
                }
                rule.trigger = Trigger::Phrases(canonical.clone());
                canonical.into_iter().map(Key::Phrase).collect()
            }
            Trigger::Any => vec![Key::Any],
            Trigger::Abandon => vec![Key::Abandon],
        };

        for key in &keys {
            let Some(earlier) = self
                .index
                .get(&(rule.state, key.clone()))
                .and_then(|ids| ids.iter().find(|id| !self.rule(**id).is_conditional()))
            else {
                continue;
            };
            let earlier = self.rule(*earlier);
            if rule.is_conditional() {
                warn!(
                    state = ?rule.state,
                    phrase = key.describe(),
                    shadowed_by = %earlier,
                    "conditional rule registered after an unconditional one can never fire"
                );
            } else if self.reject_conflicts {
                return Err(Error::conflicting_rule(rule.state, key.describe()));
            } else {
                warn!(
                    state = ?rule.state,
                    phrase = key.describe(),
                    kept = %earlier,
                    "duplicate unconditional rule ignored at dispatch"
                );
            }
        }

        let id = RuleId(
            u32::try_from(self.rules.len())
                .map_err(|_| Error::internal("trigger table is full"))?,
        );
        rule.id = Some(id);
        for key in keys {
            self.index.entry((rule.state, key)).or_default().push(id);
        }
        self.rules.push(rule);
        Ok(id)
    }

    /// Candidate rules for a phrase in a state, in dispatch order.
    #[must_use]
    pub fn lookup(&self, state: ConversationState, phrase: &str) -> Vec<&Rule<A>> {
        let exact = self.ids(state, Key::Phrase(phrase.to_string()));
        let any = self.ids(state, Key::Any);
        exact.iter().chain(any).map(|id| self.rule(*id)).collect()
    }

    /// Abandonment rules of a state, in registration order.
    #[must_use]
    pub fn lookup_abandon(&self, state: ConversationState) -> Vec<&Rule<A>> {
        self.ids(state, Key::Abandon)
            .iter()
            .map(|id| self.rule(*id))
            .collect()
    }

    /// Gets a rule by identifier.
    #[must_use]
    pub fn get(&self, id: RuleId) -> Option<&Rule<A>> {
        self.rules.get(id.0 as usize)
    }

    /// All rules in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule<A>> {
        self.rules.iter()
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn ids(&self, state: ConversationState, key: Key) -> &[RuleId] {
        self.index.get(&(state, key)).map_or(&[], Vec::as_slice)
    }

    fn rule(&self, id: RuleId) -> &Rule<A> {
        &self.rules[id.0 as usize]
    }
}

impl<A> std::fmt::Debug for TriggerTable<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerTable")
            .field("rules", &self.rules.len())
            .field("keys", &self.index.len())
            .field("reject_conflicts", &self.reject_conflicts)
            .finish_non_exhaustive()
    }
}
