//! Interactive chat REPL and CLI for Palaver.
//!
//! This crate provides:
//! - [`World`] - a demo session with a player, a clock, a market and NPCs
//! - [`Repl`] - the read-eval-print loop that lets a person talk to them
//! - [`LineEditor`] - the seam between the REPL and the terminal

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod editor;
pub mod repl;
pub mod world;

pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use repl::{Evaluated, Repl};
pub use world::{TickReport, World};
