//! Normalized sentences.
//!
//! A [`Sentence`] is created once per chat line, never mutated afterwards,
//! and dropped after the dispatch step that produced it. If the error flag is
//! set the expression list may be partial; consumers check
//! [`Sentence::has_error`] before trusting it.

use std::fmt;

/// What kind of expression a token produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpressionKind {
    /// A plain word
    Word,
    /// A non-negative integer
    Number,
    /// A quoted phrase kept together
    Quoted,
}

/// One normalized expression of a sentence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expression {
    /// Text as the player typed it (lowercased for words)
    pub original: String,
    /// Canonical text used for trigger matching
    pub normalized: String,
    /// Expression kind
    pub kind: ExpressionKind,
    /// Parsed value for numbers
    pub amount: Option<u64>,
}

impl Expression {
    /// Creates a word expression.
    #[must_use]
    pub fn word(original: impl Into<String>, normalized: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            normalized: normalized.into(),
            kind: ExpressionKind::Word,
            amount: None,
        }
    }

    /// Creates a number expression.
    #[must_use]
    pub fn number(original: impl Into<String>, amount: Option<u64>) -> Self {
        let original = original.into();
        Self {
            normalized: original.clone(),
            original,
            kind: ExpressionKind::Number,
            amount,
        }
    }

    /// Creates a quoted expression.
    #[must_use]
    pub fn quoted(original: impl Into<String>) -> Self {
        let original = original.into();
        Self {
            normalized: original.trim().to_lowercase(),
            original,
            kind: ExpressionKind::Quoted,
            amount: None,
        }
    }

    /// Returns true if this expression is a number.
    #[must_use]
    pub fn is_number(&self) -> bool {
        self.kind == ExpressionKind::Number
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized)
    }
}

/// The normalized form of one player utterance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sentence {
    original: String,
    expressions: Vec<Expression>,
    error: Option<String>,
}

impl Sentence {
    /// Creates a sentence from already normalized parts.
    #[must_use]
    pub fn new(original: impl Into<String>, expressions: Vec<Expression>) -> Self {
        Self {
            original: original.into(),
            expressions,
            error: None,
        }
    }

    /// Marks the sentence as erroneous.
    ///
    /// Repeated diagnostics are joined with `"; "`.
    #[must_use]
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.error = Some(match self.error.take() {
            Some(existing) => format!("{existing}; {message}"),
            None => message,
        });
        self
    }

    /// The raw text this sentence was built from.
    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// All expressions in order.
    #[must_use]
    pub fn expressions(&self) -> &[Expression] {
        &self.expressions
    }

    /// The trigger expression (the first one), if any.
    #[must_use]
    pub fn trigger(&self) -> Option<&Expression> {
        self.expressions.first()
    }

    /// The canonical primary phrase, or `""` for an empty sentence.
    #[must_use]
    pub fn primary_phrase(&self) -> &str {
        self.trigger().map_or("", |e| e.normalized.as_str())
    }

    /// Expressions after the trigger.
    #[must_use]
    pub fn objects(&self) -> &[Expression] {
        self.expressions.get(1..).unwrap_or_default()
    }

    /// The first number among the objects, if any.
    #[must_use]
    pub fn number(&self) -> Option<u64> {
        self.objects().iter().find_map(|e| e.amount)
    }

    /// Returns true if there are no expressions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }

    /// Returns true if normalization reported a problem.
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// The diagnostic message, if normalization reported a problem.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for expression in &self.expressions {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{expression}")?;
            first = false;
        }
        Ok(())
    }
}
