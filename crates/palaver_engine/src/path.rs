//! Patrol paths walked by NPCs between conversations.

use std::fmt;

use palaver_foundation::{Error, Result};

/// A tile position in a zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl Position {
    /// Creates a position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// An ordered list of waypoints, optionally looping.
///
/// Movement is driven by an external tick calling [`PatrolPath::advance`];
/// nothing here runs on its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatrolPath {
    nodes: Vec<Position>,
    looping: bool,
    cursor: usize,
}

impl PatrolPath {
    /// Creates a path through `nodes`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` if there are no nodes.
    pub fn new(nodes: impl IntoIterator<Item = impl Into<Position>>, looping: bool) -> Result<Self> {
        let nodes: Vec<Position> = nodes.into_iter().map(Into::into).collect();
        if nodes.is_empty() {
            return Err(Error::invalid_path("a path needs at least one node"));
        }
        Ok(Self {
            nodes,
            looping,
            cursor: 0,
        })
    }

    /// A path that never moves.
    #[must_use]
    pub fn stationary(at: Position) -> Self {
        Self {
            nodes: vec![at],
            looping: false,
            cursor: 0,
        }
    }

    /// The waypoint the walker currently stands on.
    #[must_use]
    pub fn current(&self) -> Position {
        self.nodes[self.cursor]
    }

    /// Moves to the next waypoint and returns it.
    ///
    /// A looping path wraps around; an open path stays on its last node.
    pub fn advance(&mut self) -> Position {
        if self.cursor + 1 < self.nodes.len() {
            self.cursor += 1;
        } else if self.looping {
            self.cursor = 0;
        }
        self.current()
    }

    /// All waypoints.
    #[must_use]
    pub fn nodes(&self) -> &[Position] {
        &self.nodes
    }

    /// Returns true if the path wraps around.
    #[must_use]
    pub fn is_looping(&self) -> bool {
        self.looping
    }
}
