use serde::{Deserialize, Serialize};

/// Lowest rank in the deck (the "3").
pub const MIN_RANK: u8 = 3;
/// Highest rank in the deck (the "2", ranked above the ace for beating purposes).
pub const MAX_RANK: u8 = 15;

/// Canonical suit ordering: Spades < Clubs < Diamonds < Hearts.
pub const SPADES: u8 = 0;
pub const CLUBS: u8 = 1;
pub const DIAMONDS: u8 = 2;
pub const HEARTS: u8 = 3;

/// A single playing card. `rank` runs 3..15 (11=J, 12=Q, 13=K, 14=A, 15=2);
/// `suit` runs 0..3 in the canonical ordering above.
///
/// `Card`'s derived `Ord` agrees with `value()` because `suit < 4` always,
/// so comparing `(rank, suit)` lexicographically never lets a suit
/// difference outweigh a rank difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: u8,
    pub suit: u8,
}

impl Card {
    pub fn new(rank: u8, suit: u8) -> Self {
        Self { rank, suit }
    }

    /// Total ordering key used throughout the engine: `rank*4 + suit`.
    /// The 3 of Spades is value 0, the lowest card in the deck.
    pub fn value(&self) -> u16 {
        self.rank as u16 * 4 + self.suit as u16
    }

    pub fn is_two(&self) -> bool {
        self.rank == MAX_RANK
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rank = match self.rank {
            11 => "J".to_string(),
            12 => "Q".to_string(),
            13 => "K".to_string(),
            14 => "A".to_string(),
            15 => "2".to_string(),
            r => r.to_string(),
        };
        let suit = match self.suit {
            SPADES => "S",
            CLUBS => "C",
            DIAMONDS => "D",
            HEARTS => "H",
            _ => "?",
        };
        write!(f, "{rank}{suit}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_of_spades_is_lowest() {
        let three_spades = Card::new(3, SPADES);
        assert_eq!(three_spades.value(), 0);
    }

    #[test]
    fn ordering_matches_value() {
        let a = Card::new(3, HEARTS);
        let b = Card::new(4, SPADES);
        assert!(a < b, "rank always dominates suit in ordering");
        assert_eq!(a.value(), 3);
        assert_eq!(b.value(), 16);
    }

    #[test]
    fn two_is_the_high_rank() {
        assert!(Card::new(15, SPADES).is_two());
        assert!(!Card::new(14, SPADES).is_two());
    }
}
