use serde::{Deserialize, Serialize};

use super::card::{Card, MAX_RANK};

/// Combo category a set of cards can be classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Combo {
    Invalid,
    Single,
    Pair,
    Triple,
    Quad,
    Run,
    Bomb,
}

/// Classifies a set of cards already sorted ascending by [`Card::value`].
///
/// Runs and bombs never contain a 2 (`rank == MAX_RANK`); a bomb is three or
/// more consecutive pairs, so its length is always even and at least 6.
pub fn classify(cards: &[Card]) -> Combo {
    match cards.len() {
        0 => Combo::Invalid,
        1 => Combo::Single,
        2 if same_rank(cards) => Combo::Pair,
        3 if same_rank(cards) => Combo::Triple,
        4 if same_rank(cards) => Combo::Quad,
        n if n >= 3 && is_run(cards) => Combo::Run,
        n if n >= 6 && n % 2 == 0 && is_bomb(cards) => Combo::Bomb,
        _ => Combo::Invalid,
    }
}

fn same_rank(cards: &[Card]) -> bool {
    cards.windows(2).all(|w| w[0].rank == w[1].rank)
}

fn contains_two(cards: &[Card]) -> bool {
    cards.iter().any(|c| c.rank == MAX_RANK)
}

fn is_run(cards: &[Card]) -> bool {
    if contains_two(cards) {
        return false;
    }
    cards.windows(2).all(|w| w[1].rank == w[0].rank + 1)
}

fn is_bomb(cards: &[Card]) -> bool {
    if contains_two(cards) {
        return false;
    }
    cards
        .chunks(2)
        .all(|pair| pair.len() == 2 && pair[0].rank == pair[1].rank)
        && cards
            .chunks(2)
            .collect::<Vec<_>>()
            .windows(2)
            .all(|w| w[1][0].rank == w[0][0].rank + 1)
}
