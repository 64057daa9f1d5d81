use serde::{Deserialize, Serialize};

use super::card::Card;
use super::combo::{classify, Combo};

/// A validated set of cards put down in one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Play {
    pub combo: Combo,
    pub cards: Vec<Card>,
    pub suited: bool,
    pub high_card: Card,
}

impl Play {
    /// Sorts `cards` ascending by value and classifies them. Returns `None`
    /// for an empty hand of cards (there is no such thing as an empty play).
    pub fn new(mut cards: Vec<Card>) -> Option<Self> {
        if cards.is_empty() {
            return None;
        }
        cards.sort();
        let combo = classify(&cards);
        let suited = cards.windows(2).all(|w| w[0].suit == w[1].suit);
        let high_card = *cards.last().expect("checked non-empty above");
        Some(Play {
            combo,
            cards,
            suited,
            high_card,
        })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Does `play` legally beat `last`, assuming both already classified as
/// something other than [`Combo::Invalid`]?
///
/// A quad beats a lone 2; a bomb of k pairs chops a run of 2s up to length
/// `k-1` (a single 2, a pair of 2s, or a triple of 2s for k=3,4,5
/// respectively). Otherwise the combos must match in kind (and length, for
/// runs and bombs); a suited run may only be chopped by another suited run
/// of the same length.
pub fn beats(play: &Play, last: &Play) -> bool {
    if play.combo == Combo::Quad && last.combo == Combo::Single && last.high_card.is_two() {
        return true;
    }
    if play.combo == Combo::Bomb && is_run_of_twos(last) {
        let bomb_pairs = play.len() / 2;
        let twos_len = last.len();
        return bomb_pairs >= twos_len + 2;
    }

    if play.combo != last.combo {
        return false;
    }
    match play.combo {
        Combo::Run | Combo::Bomb => {
            if play.len() != last.len() {
                return false;
            }
            if last.suited && !play.suited {
                return false;
            }
            play.high_card.value() > last.high_card.value()
        }
        Combo::Invalid => false,
        _ => play.high_card.value() > last.high_card.value(),
    }
}

fn is_run_of_twos(play: &Play) -> bool {
    play.combo == Combo::Single && play.high_card.is_two()
        || play.combo == Combo::Pair && play.high_card.is_two()
        || play.combo == Combo::Triple && play.high_card.is_two()
}
