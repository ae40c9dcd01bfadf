//! Dialogue content built on the Palaver engine.
//!
//! Three characters exercise the engine from different angles:
//!
//! - [`greeter`] - a patrolling city greeter made only of canned replies
//! - [`princess`] - a repeatable quest with conditions, quest slots, a
//!   seeded random reward and a recovery window
//! - [`market_manager`] - a multi-step negotiation that keeps scratch data
//!   between steps and talks to a shared [`market::Market`]
//!
//! [`player::Player`] is the actor all of them talk to.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod clock;
pub mod greeter;
pub mod market;
pub mod market_manager;
pub mod player;
pub mod princess;

pub use clock::GameClock;
pub use market::{Market, Offer, SharedMarket};
pub use player::Player;
