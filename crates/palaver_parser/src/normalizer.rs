//! The sentence normalization pipeline.
//!
//! Orchestrates tokenization and vocabulary lookup to turn raw chat into a
//! [`Sentence`]. The pipeline is a pure function of the input text and the
//! vocabulary it was built with.

use std::sync::Arc;

use palaver_foundation::{Error, Result};

use crate::sentence::{Expression, Sentence};
use crate::stdlib;
use crate::tokenizer::{InputToken, InputTokenizer};
use crate::vocabulary::Vocabulary;

/// Turns raw player text into normalized sentences.
#[derive(Clone, Debug)]
pub struct SentenceNormalizer {
    vocabulary: Arc<Vocabulary>,
}

impl SentenceNormalizer {
    /// Creates a normalizer over the given vocabulary.
    #[must_use]
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self {
            vocabulary: Arc::new(vocabulary),
        }
    }

    /// Creates a normalizer sharing an existing vocabulary.
    #[must_use]
    pub fn shared(vocabulary: Arc<Vocabulary>) -> Self {
        Self { vocabulary }
    }

    /// Creates a normalizer over the standard conversational vocabulary.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(stdlib::standard_vocabulary())
    }

    /// Gets a reference to the vocabulary.
    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Normalizes one chat line.
    ///
    /// Never fails: problems are recorded on the returned sentence.
    #[must_use]
    pub fn normalize(&self, raw: &str) -> Sentence {
        let tokens = InputTokenizer::tokenize(raw);
        let mut expressions = Vec::new();
        let mut errors = Vec::new();

        for token in tokens {
            match token {
                InputToken::Word(word) => {
                    if self.vocabulary.is_filler(&word) {
                        continue;
                    }
                    if word.bytes().all(|b| b.is_ascii_digit()) {
                        let amount = word.parse::<u64>().ok();
                        if amount.is_none() {
                            errors.push(format!("number too large: {word}"));
                        }
                        expressions.push(Expression::number(word, amount));
                    } else {
                        let canonical = self.vocabulary.canonical(&word).to_string();
                        expressions.push(Expression::word(word, canonical));
                    }
                }
                InputToken::QuotedString(text) => {
                    if !text.trim().is_empty() {
                        expressions.push(self.quoted(text));
                    }
                }
                InputToken::Unterminated(text) => {
                    errors.push("missing closing quote".to_string());
                    if !text.trim().is_empty() {
                        expressions.push(self.quoted(text));
                    }
                }
                InputToken::End => break,
            }
        }

        errors
            .into_iter()
            .fold(Sentence::new(raw, expressions), |sentence, message| {
                sentence.with_error(message)
            })
    }

    /// A single quoted word canonicalizes like an unquoted one.
    fn quoted(&self, text: String) -> Expression {
        let mut expression = Expression::quoted(text);
        if !expression.normalized.contains(char::is_whitespace) {
            expression.normalized = self.vocabulary.canonical(&expression.normalized).to_string();
        }
        expression
    }

    /// Canonicalizes a trigger phrase as written by a content author.
    ///
    /// The phrase must normalize cleanly to exactly one expression so that it
    /// can be compared against a sentence's primary phrase.
    ///
    /// # Errors
    ///
    /// Returns [`palaver_foundation::ErrorKind::InvalidTrigger`] otherwise.
    pub fn canonical_trigger(&self, phrase: &str) -> Result<String> {
        let sentence = self.normalize(phrase);
        if let Some(message) = sentence.error_message() {
            return Err(Error::invalid_trigger(phrase, message));
        }
        match sentence.expressions() {
            [single] => Ok(single.normalized.clone()),
            [] => Err(Error::invalid_trigger(phrase, "normalizes to nothing")),
            _ => Err(Error::invalid_trigger(
                phrase,
                "trigger phrases must be a single expression",
            )),
        }
    }
}

impl Default for SentenceNormalizer {
    fn default() -> Self {
        Self::standard()
    }
}
