//! World time shared by content that needs it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Minutes since the world started. Cheap to clone; clones share the time.
#[derive(Clone, Debug, Default)]
pub struct GameClock {
    minutes: Arc<AtomicU64>,
}

impl GameClock {
    /// Creates a clock at minute zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock at the given minute.
    #[must_use]
    pub fn at(minute: u64) -> Self {
        Self {
            minutes: Arc::new(AtomicU64::new(minute)),
        }
    }

    /// The current minute.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.minutes.load(Ordering::Relaxed)
    }

    /// Moves time forward and returns the new minute.
    pub fn advance(&self, minutes: u64) -> u64 {
        self.minutes.fetch_add(minutes, Ordering::Relaxed) + minutes
    }
}
