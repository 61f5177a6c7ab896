use rand::seq::index;
use rand::Rng;

use crate::error::GameError;

/// Number of cards in the catalog.
pub const CARD_COUNT: usize = 16;

/// Which side a card favours. Only consulted when dealing, to pick who opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardColor {
    Red,
    Blue,
}

/// Immutable movement card. Offsets are `(dx, dy)` as seen by the red side,
/// where negative `dy` is forward.
#[derive(Debug, PartialEq, Eq)]
pub struct Card {
    pub name: &'static str,
    pub moves: &'static [(i8, i8)],
    pub color: CardColor,
}

/// Index into the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(u8);

impl CardId {
    pub fn new(id: usize) -> Result<Self, GameError> {
        if id < CARD_COUNT {
            Ok(CardId(id as u8))
        } else {
            Err(GameError::UnknownCard(id))
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn card(self) -> &'static Card {
        &CARDS[self.index()]
    }

    /// Id scaled into [0, 1) for the feature vector.
    pub fn normalized(self) -> f32 {
        self.0 as f32 / CARD_COUNT as f32
    }
}

pub static CARDS: [Card; CARD_COUNT] = [
    Card { name: "Tiger", moves: &[(0, -2), (0, 1)], color: CardColor::Blue },
    Card { name: "Dragon", moves: &[(-2, -1), (-1, 1), (2, -1), (1, 1)], color: CardColor::Red },
    Card { name: "Crab", moves: &[(0, -1), (-2, 0), (2, 0)], color: CardColor::Blue },
    Card { name: "Elephant", moves: &[(-1, -1), (-1, 0), (1, -1), (1, 0)], color: CardColor::Red },
    Card { name: "Mantis", moves: &[(-1, -1), (1, -1), (0, 1)], color: CardColor::Red },
    Card { name: "Boar", moves: &[(0, -1), (-1, 0), (1, 0)], color: CardColor::Red },
    Card { name: "Frog", moves: &[(-2, 0), (-1, -1), (1, 1)], color: CardColor::Red },
    Card { name: "Goose", moves: &[(-1, 0), (-1, -1), (1, 0), (1, 1)], color: CardColor::Blue },
    Card { name: "Horse", moves: &[(0, -1), (-1, 0), (0, 1)], color: CardColor::Red },
    Card { name: "Eel", moves: &[(-1, -1), (-1, 0), (1, 1)], color: CardColor::Blue },
    Card { name: "Rabbit", moves: &[(2, 0), (1, -1), (-1, 1)], color: CardColor::Blue },
    Card { name: "Rooster", moves: &[(-1, -1), (-1, 0), (1, 0), (1, 1)], color: CardColor::Red },
    Card { name: "Monkey", moves: &[(-1, -1), (-1, 1), (1, -1), (1, 1)], color: CardColor::Blue },
    Card { name: "Crane", moves: &[(0, -1), (-1, 1), (1, 1)], color: CardColor::Blue },
    Card { name: "Ox", moves: &[(0, -1), (1, 0), (0, 1)], color: CardColor::Blue },
    Card { name: "Cobra", moves: &[(1, -1), (1, 0), (-1, 1)], color: CardColor::Red },
];

/// Look up a card definition by raw id.
pub fn definition_of(id: usize) -> Result<&'static Card, GameError> {
    CardId::new(id).map(CardId::card)
}

/// Draw `k` distinct card ids uniformly without replacement.
///
/// Panics if `k` exceeds the catalog size.
pub fn sample_distinct<R: Rng + ?Sized>(rng: &mut R, k: usize) -> Vec<CardId> {
    index::sample(rng, CARD_COUNT, k)
        .iter()
        .map(|i| CardId(i as u8))
        .collect()
}
