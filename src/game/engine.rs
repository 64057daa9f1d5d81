use serde::{Deserialize, Serialize};

use crate::cards::{beats, Card, Combo, Play};
use crate::protocol::ErrorCode;

use super::deck::{deal_hands, find_three_of_spades};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveAction {
    Play,
    Pass,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    pub player_pos: usize,
    pub action: MoveAction,
    pub cards: Vec<Card>,
}

/// One hand of Thirteen: four seats' cards plus whose turn it is, what must
/// be beaten, and who has already gone out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub player_ids: [String; 4],
    pub hands: [Vec<Card>; 4],
    pub current_player: usize,
    pub last_play: Option<Play>,
    pub passed_players: [bool; 4],
    pub win_order: Vec<usize>,
    pub move_history: Vec<MoveRecord>,
}

impl Game {
    /// Deals a fresh hand. The seat holding the 3 of Spades opens with power.
    pub fn deal(player_ids: [String; 4]) -> Self {
        let hands = deal_hands();
        let current_player = find_three_of_spades(&hands);
        Game {
            player_ids,
            hands,
            current_player,
            last_play: None,
            passed_players: [false; 4],
            win_order: Vec::new(),
            move_history: Vec::new(),
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.win_order.len() >= 3
    }

    fn is_active(&self, pos: usize) -> bool {
        !self.win_order.contains(&pos)
    }

    /// Validates that `cards` can legally be played by `pos` right now,
    /// returning the classified [`Play`] on success so callers never
    /// reclassify the same cards twice.
    pub fn validate_play(&self, pos: usize, cards: Vec<Card>) -> Result<Play, ErrorCode> {
        if pos != self.current_player {
            return Err(ErrorCode::NotYourTurn);
        }
        if self.passed_players[pos] {
            return Err(ErrorCode::AlreadyPassed);
        }
        let play = Play::new(cards).ok_or(ErrorCode::InvalidCombo)?;
        if play.combo == Combo::Invalid {
            return Err(ErrorCode::InvalidCombo);
        }
        match &self.last_play {
            None if play.combo == Combo::Bomb => return Err(ErrorCode::CantOpenWithBomb),
            None => {}
            Some(last) if !beats(&play, last) => return Err(ErrorCode::CantBeatLastPlay),
            Some(_) => {}
        }
        Ok(play)
    }

    /// Plays `play` for seat `pos`. Caller must have obtained `play` from
    /// [`Game::validate_play`] for the same `pos` against the current state.
    pub fn play_cards(&mut self, pos: usize, play: Play) {
        let hand = &mut self.hands[pos];
        for card in &play.cards {
            if let Some(idx) = hand.iter().position(|c| c.value() == card.value()) {
                hand.remove(idx);
            }
        }
        self.move_history.push(MoveRecord {
            player_pos: pos,
            action: MoveAction::Play,
            cards: play.cards.clone(),
        });
        self.last_play = Some(play);
        self.passed_players = [false; 4];
        if self.hands[pos].is_empty() {
            self.win_order.push(pos);
        }
        self.advance_turn();
    }

    pub fn pass_turn(&mut self, pos: usize) -> Result<(), ErrorCode> {
        if pos != self.current_player {
            return Err(ErrorCode::NotYourTurn);
        }
        if self.last_play.is_none() {
            return Err(ErrorCode::CantPass);
        }
        if self.passed_players[pos] {
            return Err(ErrorCode::AlreadyPassed);
        }
        self.passed_players[pos] = true;
        self.move_history.push(MoveRecord {
            player_pos: pos,
            action: MoveAction::Pass,
            cards: Vec::new(),
        });
        self.advance_turn();
        Ok(())
    }

    /// Advances `current_player` to the next active seat, skipping anyone
    /// already in `win_order`, then grants power back if every other still
    /// active seat has passed.
    fn advance_turn(&mut self) {
        if self.is_game_over() {
            return;
        }
        let mut next = self.current_player;
        for _ in 0..4 {
            next = (next + 1) % 4;
            if self.is_active(next) {
                break;
            }
        }
        self.current_player = next;

        let all_others_passed = (0..4)
            .filter(|&p| p != next && self.is_active(p))
            .all(|p| self.passed_players[p]);
        if all_others_passed {
            self.last_play = None;
            self.passed_players = [false; 4];
        }
    }

    /// The last remaining active seat when only one is left un-resolved.
    /// Used by the dispatcher to complete `win_order` at game end.
    pub fn last_active_seat(&self) -> Option<usize> {
        let mut active = (0..4).filter(|p| self.is_active(*p));
        let only = active.next();
        if active.next().is_some() {
            None
        } else {
            only
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CLUBS, DIAMONDS, HEARTS, SPADES};

    fn ids() -> [String; 4] {
        ["a".into(), "b".into(), "c".into(), "d".into()]
    }

    fn stack_three_of_spades_in_seat(mut game: Game, seat: usize) -> Game {
        let current = game.current_player;
        if current != seat {
            game.hands.swap(current, seat);
        }
        game.current_player = seat;
        game
    }

    #[test]
    fn opening_play_must_come_from_the_seat_with_power() {
        let game = Game::deal(ids());
        let opener = game.current_player;
        let other = (opener + 1) % 4;
        let result = game.validate_play(other, vec![Card::new(3, SPADES)]);
        assert_eq!(result, Err(ErrorCode::NotYourTurn));
    }

    #[test]
    fn cant_open_with_a_bomb() {
        let game = Game::deal(ids());
        let opener = game.current_player;
        let bomb = vec![
            Card::new(3, SPADES),
            Card::new(3, CLUBS),
            Card::new(4, SPADES),
            Card::new(4, CLUBS),
            Card::new(5, SPADES),
            Card::new(5, CLUBS),
        ];
        assert_eq!(
            game.validate_play(opener, bomb),
            Err(ErrorCode::CantOpenWithBomb)
        );
    }

    #[test]
    fn quad_beats_a_lone_two_in_play() {
        let mut game = Game::deal(ids());
        game.hands[0] = vec![Card::new(15, SPADES)];
        game.hands[1] = vec![
            Card::new(5, SPADES),
            Card::new(5, CLUBS),
            Card::new(5, DIAMONDS),
            Card::new(5, HEARTS),
        ];
        game.current_player = 0;
        game.last_play = None;
        game.passed_players = [false; 4];
        let play = game.validate_play(0, vec![Card::new(15, SPADES)]).unwrap();
        game.play_cards(0, play);
        assert_eq!(game.current_player, 1);
        let quad = game
            .validate_play(
                1,
                vec![
                    Card::new(5, SPADES),
                    Card::new(5, CLUBS),
                    Card::new(5, DIAMONDS),
                    Card::new(5, HEARTS),
                ],
            )
            .unwrap();
        game.play_cards(1, quad);
        assert_eq!(game.last_play.as_ref().unwrap().combo, Combo::Quad);
    }

    #[test]
    fn power_transfers_back_after_all_others_pass() {
        let mut game = stack_three_of_spades_in_seat(Game::deal(ids()), 0);
        game.hands[0] = vec![Card::new(13, SPADES)];
        let play = game.validate_play(0, vec![Card::new(13, SPADES)]).unwrap();
        game.play_cards(0, play);
        assert_eq!(game.current_player, 1);
        game.pass_turn(1).unwrap();
        game.pass_turn(2).unwrap();
        game.pass_turn(3).unwrap();
        assert_eq!(game.current_player, 0);
        assert!(game.last_play.is_none());
        assert_eq!(game.passed_players, [false; 4]);
    }

    #[test]
    fn cannot_pass_while_holding_power() {
        let game = Game::deal(ids());
        let opener = game.current_player;
        assert_eq!(game.pass_turn(opener), Err(ErrorCode::CantPass));
    }

    #[test]
    fn win_order_grows_monotonically_as_hands_empty() {
        let mut game = stack_three_of_spades_in_seat(Game::deal(ids()), 0);
        game.hands[0] = vec![Card::new(3, SPADES)];
        let play = game.validate_play(0, vec![Card::new(3, SPADES)]).unwrap();
        game.play_cards(0, play);
        assert_eq!(game.win_order, vec![0]);
        assert!(game.hands[0].is_empty());
    }
}
