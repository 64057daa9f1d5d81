use crate::cards::Play;
use crate::game::Game;

use super::evaluator::legal_plays;

/// Picks the bot's move for seat `pos`. With power (no last play to beat) it
/// always opens with its single lowest card. Otherwise it plays whichever
/// legal combination has the lowest high card; if nothing beats the table,
/// it passes.
pub fn choose_play(game: &Game, pos: usize) -> Option<Play> {
    if game.last_play.is_none() {
        return game.hands[pos]
            .iter()
            .min()
            .copied()
            .map(|card| Play::new(vec![card]).expect("single card always forms a valid play"));
    }

    legal_plays(game, pos)
        .into_iter()
        .min_by_key(|play| play.high_card.value())
}
