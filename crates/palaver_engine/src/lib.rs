//! NPC conversation engine for Palaver.
//!
//! Every NPC owns a deterministic finite-state machine per player it talks
//! to. A chat line is normalized, matched against rules registered for the
//! conversation's current state, and the first rule whose condition holds
//! replies, runs its action, and moves the conversation to its next state.
//!
//! # Layers
//!
//! - [`rule`] / [`table`] - rules and the (state, phrase) index over them
//! - [`condition`] / [`action`] - the predicate and side-effect contracts
//! - [`context`] - per NPC-player conversation state and scratch data
//! - [`engine`] - the dispatch algorithm
//! - [`builder`] / [`phrases`] - registration helpers for dialogue content
//! - [`npc`] / [`definition`] / [`registry`] / [`path`] - NPCs built from
//!   data-driven definitions and held in an explicit registry
//! - [`actor`] / [`quest`] - the player-side collaborator contract

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod actor;
pub mod builder;
pub mod condition;
pub mod config;
pub mod context;
pub mod definition;
pub mod engine;
pub mod npc;
pub mod path;
pub mod phrases;
pub mod quest;
pub mod registry;
pub mod rule;
pub mod table;

pub use action::{ActionError, ChatAction, Exchange};
pub use actor::Actor;
pub use builder::DialogueBuilder;
pub use condition::ChatCondition;
pub use config::{EngineConfig, NpcConfig};
pub use context::{ConversationContext, Scratch};
pub use definition::{NpcBuilder, NpcDefinition};
pub use engine::{DialogueEngine, Reply, StepOutcome};
pub use npc::Npc;
pub use path::{PatrolPath, Position};
pub use quest::QuestLog;
pub use registry::NpcRegistry;
pub use rule::{Rule, RuleId, Trigger};
pub use table::TriggerTable;
