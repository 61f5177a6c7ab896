//! Core Onitama rules: card catalog, board, players, actions and the match
//! state machine.

mod action;
mod board;
pub mod cards;
mod player;
mod state;

pub use action::{Action, HandSlot};
pub use board::{Board, Coord, EMPTY, MASTER, PAWN, SIZE};
pub use cards::{Card, CardColor, CardId, CARDS, CARD_COUNT};
pub use player::Player;
pub use state::{GameOutcome, MatchState, StateVector, FEATURE_SIZE, MAX_TURNS};
