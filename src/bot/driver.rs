use crate::game::{Game, MoveRecord};

use super::policy::choose_play;

/// Safety cap on consecutive bot-only turns, guarding against a logic bug
/// turning into an infinite loop inside a single dispatch call.
const SAFETY_CAP: usize = 100;

/// Runs bot seats' turns until a human seat is up or the game ends,
/// returning the moves that were made so the dispatcher can fold them into
/// the eventual broadcast.
pub fn run_bot_turns(game: &mut Game, is_bot: impl Fn(usize) -> bool) -> Vec<MoveRecord> {
    let history_start = game.move_history.len();
    let mut iterations = 0;
    while iterations < SAFETY_CAP && !game.is_game_over() && is_bot(game.current_player) {
        let pos = game.current_player;
        match choose_play(game, pos) {
            Some(play) => game.play_cards(pos, play),
            None => {
                game.pass_turn(pos)
                    .expect("bot never passes while holding power");
            }
        }
        iterations += 1;
    }
    game.move_history[history_start..].to_vec()
}
