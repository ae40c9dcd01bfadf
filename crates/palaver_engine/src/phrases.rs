//! Standard trigger phrase lists shared by dialogue content.

/// Opening an exchange.
pub const GREETING: &[&str] = &["hi", "hello", "greetings", "hola"];

/// Ending an exchange.
pub const GOODBYE: &[&str] = &["bye", "goodbye", "farewell", "cya", "adios"];

/// Accepting an offer or question.
pub const YES: &[&str] = &["yes", "ok", "yep", "sure"];

/// Declining an offer or question.
pub const NO: &[&str] = &["no", "nope", "nothing", "none"];

/// Asking about the NPC's occupation.
pub const JOB: &[&str] = &["job", "work", "occupation"];

/// Asking for help.
pub const HELP: &[&str] = &["help", "ayuda"];

/// Asking what the NPC sells or buys.
pub const OFFER: &[&str] = &["offer", "deal", "trade"];

/// Asking for a quest.
pub const QUEST: &[&str] = &["task", "quest", "favor", "favour"];
