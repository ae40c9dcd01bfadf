//! Palaver - state-machine NPC conversations for multiplayer game servers
//!
//! This crate re-exports all layers of the Palaver system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: palaver_runtime    — chat REPL and CLI
//! Layer 3: palaver_content    — greeter, princess quest, market manager
//! Layer 2: palaver_engine     — rules, trigger table, dispatch, NPCs
//! Layer 1: palaver_parser     — tokenizer, vocabulary, sentence normalizer
//! Layer 0: palaver_foundation — identities, conversation states, errors
//! ```

pub use palaver_content as content;
pub use palaver_engine as engine;
pub use palaver_foundation as foundation;
pub use palaver_parser as parser;
pub use palaver_runtime as runtime;
