use rand::seq::SliceRandom;

use crate::cards::{Card, CLUBS, DIAMONDS, HEARTS, MAX_RANK, MIN_RANK, SPADES};

/// Builds the 52-card deck in a fixed, unshuffled order (rank-major,
/// suit-minor), matching the canonical suit ordering used everywhere else.
pub fn build_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(52);
    for rank in MIN_RANK..=MAX_RANK {
        for suit in [SPADES, CLUBS, DIAMONDS, HEARTS] {
            deck.push(Card::new(rank, suit));
        }
    }
    deck
}

/// Shuffles a deck in place using the crate-standard thread-local RNG.
pub fn shuffle_deck(deck: &mut [Card]) {
    let mut rng = rand::rng();
    deck.shuffle(&mut rng);
}

/// Deals a freshly shuffled deck into four 13-card hands, each sorted
/// ascending by value. Hand `i` receives every 4th card starting at `i`.
pub fn deal_hands() -> [Vec<Card>; 4] {
    let mut deck = build_deck();
    shuffle_deck(&mut deck);

    let mut hands: [Vec<Card>; 4] = Default::default();
    for (i, card) in deck.into_iter().enumerate() {
        hands[i % 4].push(card);
    }
    for hand in &mut hands {
        hand.sort();
    }
    hands
}

/// Position of the seat holding the 3 of Spades (value 0), which opens the
/// first game of a match.
pub fn find_three_of_spades(hands: &[Vec<Card>; 4]) -> usize {
    hands
        .iter()
        .position(|hand| hand.first().map(|c| c.value()) == Some(0))
        .expect("one hand always holds the 3 of spades after a full deal")
}
