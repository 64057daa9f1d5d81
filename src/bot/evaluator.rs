use crate::cards::{Card, Combo, Play, MAX_RANK, MIN_RANK};
use crate::game::Game;

/// Buckets a hand by rank, ascending by suit within each bucket.
fn rank_buckets(hand: &[Card]) -> Vec<(u8, Vec<Card>)> {
    let mut buckets: Vec<(u8, Vec<Card>)> = Vec::new();
    for &card in hand {
        match buckets.iter_mut().find(|(r, _)| *r == card.rank) {
            Some((_, cards)) => cards.push(card),
            None => buckets.push((card.rank, vec![card])),
        }
    }
    buckets
}

fn combinations(items: &[Card], k: usize) -> Vec<Vec<Card>> {
    if k == 0 {
        return vec![Vec::new()];
    }
    if items.len() < k {
        return Vec::new();
    }
    let mut out = Vec::new();
    for i in 0..=items.len() - k {
        for mut rest in combinations(&items[i + 1..], k - 1) {
            let mut combo = vec![items[i]];
            combo.append(&mut rest);
            out.push(combo);
        }
    }
    out
}

/// Every candidate grouping of `hand` worth trying against `required`,
/// before legality is checked against the table's current state. Runs and
/// bombs pick one representative (lowest suit available) per rank rather
/// than exploring every suit assignment, which would only ever change
/// which specific cards are spent, never whether the play is legal.
pub fn candidate_plays(hand: &[Card], required_len: Option<(Combo, usize)>) -> Vec<Vec<Card>> {
    let buckets = rank_buckets(hand);
    let mut candidates = Vec::new();

    let want = |combo: Combo| match required_len {
        Some((c, _)) => c == combo,
        None => true,
    };

    if want(Combo::Single) {
        for &card in hand {
            candidates.push(vec![card]);
        }
    }
    for (size, combo) in [(2, Combo::Pair), (3, Combo::Triple), (4, Combo::Quad)] {
        if !want(combo) {
            continue;
        }
        for (_, cards) in &buckets {
            candidates.extend(combinations(cards, size));
        }
    }

    let run_lengths: Vec<usize> = match required_len {
        Some((Combo::Run, len)) => vec![len],
        Some(_) => vec![],
        None => (3..=13).collect(),
    };
    for len in run_lengths {
        for start_rank in MIN_RANK..MAX_RANK {
            if start_rank as usize + len - 1 > (MAX_RANK - 1) as usize {
                break;
            }
            let mut run = Vec::with_capacity(len);
            let mut ok = true;
            for offset in 0..len {
                let rank = start_rank + offset as u8;
                match buckets.iter().find(|(r, _)| *r == rank) {
                    Some((_, cards)) => run.push(*cards.iter().min_by_key(|c| c.suit).unwrap()),
                    None => {
                        ok = false;
                        break;
                    }
                }
            }
            if ok {
                candidates.push(run);
            }
        }
    }

    let bomb_pair_counts: Vec<usize> = match required_len {
        Some((Combo::Bomb, len)) => vec![len / 2],
        Some(_) => vec![],
        None => (3..=6).collect(),
    };
    for pairs in bomb_pair_counts {
        for start_rank in MIN_RANK..MAX_RANK {
            if start_rank as usize + pairs - 1 > (MAX_RANK - 1) as usize {
                break;
            }
            let mut bomb = Vec::with_capacity(pairs * 2);
            let mut ok = true;
            for offset in 0..pairs {
                let rank = start_rank + offset as u8;
                match buckets.iter().find(|(r, _)| *r == rank) {
                    Some((_, cards)) if cards.len() >= 2 => {
                        let mut sorted: Vec<Card> = cards.clone();
                        sorted.sort_by_key(|c| c.suit);
                        bomb.push(sorted[0]);
                        bomb.push(sorted[1]);
                    }
                    _ => {
                        ok = false;
                        break;
                    }
                }
            }
            if ok {
                candidates.push(bomb);
            }
        }
    }

    candidates
}

/// Every play in `hand` that is legal for `pos` to make right now. Each
/// candidate is built purely from hand contents and re-validated through
/// [`Game::validate_play`] so the bot holds no rule logic of its own.
pub fn legal_plays(game: &Game, pos: usize) -> Vec<Play> {
    let required_len = game
        .last_play
        .as_ref()
        .filter(|p| matches!(p.combo, Combo::Run | Combo::Bomb))
        .map(|p| (p.combo, p.len()));

    candidate_plays(&game.hands[pos], required_len)
        .into_iter()
        .filter_map(|cards| game.validate_play(pos, cards).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CLUBS, DIAMONDS, HEARTS, SPADES};

    fn ids() -> [String; 4] {
        ["a".into(), "b".into(), "c".into(), "d".into()]
    }

    #[test]
    fn legal_plays_with_power_includes_every_single() {
        let mut game = Game::deal(ids());
        game.hands[0] = vec![Card::new(3, SPADES), Card::new(7, CLUBS)];
        game.current_player = 0;
        game.last_play = None;
        let plays = legal_plays(&game, 0);
        assert!(plays.iter().any(|p| p.combo == Combo::Single && p.cards == vec![Card::new(3, SPADES)]));
        assert!(plays.iter().any(|p| p.combo == Combo::Single && p.cards == vec![Card::new(7, CLUBS)]));
    }

    #[test]
    fn legal_plays_against_a_run_only_offers_matching_length_runs() {
        let mut game = Game::deal(ids());
        game.hands[0] = vec![
            Card::new(8, SPADES),
            Card::new(9, CLUBS),
            Card::new(10, SPADES),
            Card::new(11, HEARTS),
        ];
        game.current_player = 0;
        game.last_play = Play::new(vec![
            Card::new(5, SPADES),
            Card::new(6, CLUBS),
            Card::new(7, DIAMONDS),
        ]);
        let plays = legal_plays(&game, 0);
        assert!(plays.iter().all(|p| p.combo == Combo::Run && p.len() == 3));
    }
}
