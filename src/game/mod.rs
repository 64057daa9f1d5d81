//! The Thirteen game engine: dealing, legality, turn advancement.

mod deck;
mod engine;

pub use deck::{build_deck, deal_hands, find_three_of_spades, shuffle_deck};
pub use engine::{Game, MoveAction, MoveRecord};
