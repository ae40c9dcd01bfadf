//! Error types for the Palaver system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context. These
//! errors describe configuration problems (bad registrations, unknown names,
//! duplicate NPCs). Nothing that happens while dispatching a chat line is
//! reported through them.

use std::fmt;

use thiserror::Error;

use crate::state::ConversationState;

/// Convenience alias used across all Palaver crates.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Palaver operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an empty trigger set error.
    #[must_use]
    pub fn empty_trigger_set(state: ConversationState) -> Self {
        Self::new(ErrorKind::EmptyTriggerSet { state })
    }

    /// Creates an error for a rule that has neither a reply nor an action.
    #[must_use]
    pub fn missing_response(state: ConversationState) -> Self {
        Self::new(ErrorKind::MissingResponse { state })
    }

    /// Creates a conflicting rule error.
    #[must_use]
    pub fn conflicting_rule(state: ConversationState, phrase: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConflictingRule {
            state,
            phrase: phrase.into(),
        })
    }

    /// Creates an unknown state error.
    #[must_use]
    pub fn unknown_state(name: String) -> Self {
        Self::new(ErrorKind::UnknownState(name))
    }

    /// Creates a duplicate NPC error.
    #[must_use]
    pub fn duplicate_npc(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateNpc(name.into()))
    }

    /// Creates an invalid trigger phrase error.
    #[must_use]
    pub fn invalid_trigger(phrase: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidTrigger {
            phrase: phrase.into(),
            reason: reason.into(),
        })
    }

    /// Creates an invalid path error.
    #[must_use]
    pub fn invalid_path(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidPath(message.into()))
    }

    /// Creates an I/O error.
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io(message.into()))
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A trigger set was given without any usable phrase.
    #[error("empty trigger set registered in state {state}")]
    EmptyTriggerSet {
        /// The state the rule was registered for.
        state: ConversationState,
    },

    /// A rule carries neither a reply nor an action.
    #[error("rule in state {state} has neither a reply nor an action")]
    MissingResponse {
        /// The state the rule was registered for.
        state: ConversationState,
    },

    /// Two unconditional rules compete for the same key.
    #[error("conflicting unconditional rules for '{phrase}' in state {state}")]
    ConflictingRule {
        /// The state both rules were registered for.
        state: ConversationState,
        /// The canonical trigger phrase (`*` for the wildcard).
        phrase: String,
    },

    /// A trigger phrase does not normalize to exactly one expression.
    #[error("invalid trigger phrase '{phrase}': {reason}")]
    InvalidTrigger {
        /// The phrase as written by the content author.
        phrase: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A state name was never interned.
    #[error("unknown conversation state: {0}")]
    UnknownState(String),

    /// An NPC with the same name is already registered.
    #[error("duplicate NPC: {0}")]
    DuplicateNpc(String),

    /// A patrol path could not be built.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// I/O failure (loading scripts, reading terminals).
    #[error("i/o error: {0}")]
    Io(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// NPC whose dialogue was being built.
    pub npc: Option<String>,
    /// Content module or script that registered the rule.
    pub source: Option<String>,
    /// Chain of builders that led to the failure.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the NPC name.
    #[must_use]
    pub fn with_npc(mut self, npc: impl Into<String>) -> Self {
        self.npc = Some(npc.into());
        self
    }

    /// Sets the source.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(npc) = &self.npc {
            write!(f, "while building {npc}")?;
        }
        if let Some(source) = &self.source {
            write!(f, " from {source}")?;
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}
