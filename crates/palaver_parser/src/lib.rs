//! Chat sentence normalization for NPC conversations.
//!
//! This crate turns free-form player chat like `"Prolong 3, please!"` into a
//! [`Sentence`] the conversation engine can match against trigger phrases.
//!
//! # Architecture
//!
//! ```text
//! "Prolong 3, please!"
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   TOKENIZER     │  → [Word("prolong"), Word("3"), Word("please")]
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ VOCABULARY      │  → drop fillers, fold plurals and spelling variants
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ SENTENCE        │  → primary "prolong", objects [Number(3)], no error
//! └─────────────────┘
//! ```
//!
//! Normalization never fails: malformed input yields a sentence whose error
//! flag is set, with whatever expressions could still be recovered.
//!
//! # Modules
//!
//! - [`tokenizer`] - Convert raw input to a token stream
//! - [`vocabulary`] - Canonical word forms and filler words
//! - [`sentence`] - The normalized sentence and its expressions
//! - [`normalizer`] - The normalization pipeline
//! - [`stdlib`] - Standard conversational vocabulary

pub mod normalizer;
pub mod sentence;
pub mod stdlib;
pub mod tokenizer;
pub mod vocabulary;

// Re-export main types for convenience
pub use normalizer::SentenceNormalizer;
pub use sentence::{Expression, ExpressionKind, Sentence};
pub use vocabulary::{Vocabulary, Word};
