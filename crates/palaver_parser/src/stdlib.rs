//! Standard conversational vocabulary.
//!
//! Provides the fillers and word forms every NPC understands. Content can
//! extend the returned [`Vocabulary`] before building a normalizer from it.

use crate::vocabulary::{Vocabulary, Word};

/// Articles and politeness words ignored during matching.
pub const FILLERS: &[&str] = &["a", "an", "the", "please", "pls", "plz"];

/// Nouns players commonly use in the plural.
const REGULAR_NOUNS: &[&str] = &[
    "task", "quest", "job", "offer", "drink", "item", "reward", "number", "trade", "service",
];

/// Creates the standard vocabulary.
#[must_use]
pub fn standard_vocabulary() -> Vocabulary {
    let mut vocab = Vocabulary::new();

    for filler in FILLERS {
        vocab.register_filler(*filler);
    }

    for noun in REGULAR_NOUNS {
        vocab.register_word(Word::new(*noun).with_plural());
    }

    vocab.register_word(
        Word::new("favor")
            .with_plural()
            .with_form("favour")
            .with_form("favours"),
    );
    vocab.register_word(Word::new("goodbye").with_form("good-bye"));
    vocab.register_word(Word::new("ok").with_form("okay"));

    vocab
}
