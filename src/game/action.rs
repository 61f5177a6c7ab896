use std::fmt;

use super::board::Coord;

/// Which of the mover's two hand cards is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HandSlot {
    First,
    Second,
}

impl HandSlot {
    pub const BOTH: [HandSlot; 2] = [HandSlot::First, HandSlot::Second];

    pub fn index(self) -> usize {
        match self {
            HandSlot::First => 0,
            HandSlot::Second => 1,
        }
    }
}

/// A candidate move: source cell, destination cell and the hand slot used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Action {
    pub from: Coord,
    pub to: Coord,
    pub slot: HandSlot,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{})->({},{}) card {}",
            self.from.x,
            self.from.y,
            self.to.x,
            self.to.y,
            self.slot.index()
        )
    }
}
