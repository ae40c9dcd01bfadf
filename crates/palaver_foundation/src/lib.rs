//! Core types shared by every Palaver layer.
//!
//! This crate provides:
//! - [`ActorId`] and [`NpcId`] - identities of the two parties of a conversation
//! - [`ConversationState`] - compact symbolic state identifiers
//! - [`StateRegistry`] - interning of application-defined states by name
//! - [`Error`] - configuration errors with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod identity;
pub mod state;

pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use identity::{ActorId, NpcId};
pub use state::{ConversationState, StateRegistry};
