use super::board::Coord;
use super::cards::CardColor;

/// The two sides. `A` (red) starts on the bottom row and moves toward row 0,
/// `B` (blue) starts on row 0 and moves toward row 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    A,
    B,
}

impl Player {
    /// Get the other player
    pub fn other(self) -> Player {
        match self {
            Player::A => Player::B,
            Player::B => Player::A,
        }
    }

    /// +1 for A, -1 for B. Matches the sign of the side's piece codes.
    pub fn sign(self) -> i8 {
        match self {
            Player::A => 1,
            Player::B => -1,
        }
    }

    /// The side that opens when the center card has this color.
    pub fn from_color(color: CardColor) -> Player {
        match color {
            CardColor::Red => Player::A,
            CardColor::Blue => Player::B,
        }
    }

    /// Row holding this side's starting rank.
    pub fn home_row(self) -> usize {
        match self {
            Player::A => 4,
            Player::B => 0,
        }
    }

    /// The shrine this side defends.
    pub fn shrine(self) -> Coord {
        Coord::new(2, self.home_row())
    }

    /// Orient a card offset for this side. Cards are authored for A, so B
    /// negates both components.
    pub fn orient(self, (dx, dy): (i8, i8)) -> (i8, i8) {
        match self {
            Player::A => (dx, dy),
            Player::B => (-dx, -dy),
        }
    }

    /// Get player name for display
    pub fn name(self) -> &'static str {
        match self {
            Player::A => "Red",
            Player::B => "Blue",
        }
    }
}
