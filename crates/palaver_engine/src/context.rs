//! Per NPC-player conversation state.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use palaver_foundation::{ActorId, ConversationState};

/// Typed scratch storage an action can use between two dispatch steps.
///
/// Values are keyed by a static name and retrieved by type. A lookup with
/// the wrong type behaves as if the key were absent.
#[derive(Default)]
pub struct Scratch {
    slots: HashMap<&'static str, Box<dyn Any + Send + Sync>>,
}

impl Scratch {
    /// Creates empty scratch storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value, replacing whatever was under the key.
    pub fn insert<T: Any + Send + Sync>(&mut self, key: &'static str, value: T) {
        self.slots.insert(key, Box::new(value));
    }

    /// Borrows a value.
    #[must_use]
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.slots.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    /// Mutably borrows a value.
    pub fn get_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.slots.get_mut(key).and_then(|v| v.downcast_mut::<T>())
    }

    /// Removes and returns a value if it has the requested type.
    ///
    /// A value of another type stays in place.
    pub fn take<T: Any>(&mut self, key: &str) -> Option<T> {
        if !self.slots.get(key).is_some_and(|v| v.is::<T>()) {
            return None;
        }
        self.slots
            .remove(key)
            .and_then(|v| v.downcast::<T>().ok())
            .map(|b| *b)
    }

    /// Removes a value of any type.
    pub fn remove(&mut self, key: &str) -> bool {
        self.slots.remove(key).is_some()
    }

    /// Returns true if a value is stored under the key.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    /// Removes everything.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl fmt::Debug for Scratch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.slots.keys().collect();
        keys.sort_unstable();
        f.debug_set().entries(keys).finish()
    }
}

/// The live state machine of one NPC-player pair.
///
/// There is always exactly one current state. It only changes inside a
/// dispatch step (or an abandonment, which is dispatched the same way), so
/// no public setter exists.
#[derive(Debug)]
pub struct ConversationContext {
    actor: ActorId,
    initial: ConversationState,
    state: ConversationState,
    scratch: Scratch,
    steps: u64,
}

impl ConversationContext {
    /// Creates a context resting in its initial state.
    #[must_use]
    pub fn new(actor: ActorId, initial: ConversationState) -> Self {
        Self {
            actor,
            initial,
            state: initial,
            scratch: Scratch::new(),
            steps: 0,
        }
    }

    /// Starts the context in a different state than its initial one.
    ///
    /// Used when restoring an exchange or setting up a scenario.
    #[must_use]
    pub fn starting_in(mut self, state: ConversationState) -> Self {
        self.state = state;
        self
    }

    /// The actor on the other side of this conversation.
    #[must_use]
    pub fn actor(&self) -> ActorId {
        self.actor
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> ConversationState {
        self.state
    }

    /// The idle state this context returns to when an exchange ends.
    #[must_use]
    pub fn initial_state(&self) -> ConversationState {
        self.initial
    }

    /// Number of dispatch steps that selected a rule.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Returns true if an exchange is in progress.
    #[must_use]
    pub fn is_engaged(&self) -> bool {
        self.state != self.initial
    }

    /// Returns true if the context can be evicted without losing anything.
    #[must_use]
    pub fn is_dormant(&self) -> bool {
        !self.is_engaged() && self.scratch.is_empty()
    }

    /// Read-only access to scratch data.
    #[must_use]
    pub fn scratch(&self) -> &Scratch {
        &self.scratch
    }

    pub(crate) fn scratch_mut(&mut self) -> &mut Scratch {
        &mut self.scratch
    }

    pub(crate) fn transition(&mut self, state: ConversationState) {
        self.state = state;
    }

    pub(crate) fn record_step(&mut self) {
        self.steps += 1;
    }

    /// Returns to the initial state and drops scratch data.
    pub(crate) fn reset(&mut self) {
        self.state = self.initial;
        self.scratch.clear();
    }
}
