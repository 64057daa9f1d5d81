use serde::{Deserialize, Serialize};

use crate::game::Game;
use crate::protocol::ErrorCode;

use super::seat::Seat;

pub const DEFAULT_TARGET_SCORE: u32 = 21;
pub const DEFAULT_DISCONNECT_GRACE_SECONDS: i64 = 5;
const PLACEMENT_POINTS: [u32; 4] = [4, 2, 1, 0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Waiting,
    Starting,
    InProgress,
    BetweenGames,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameHistoryEntry {
    pub game_number: u32,
    pub win_order: Vec<usize>,
    pub points_awarded: Vec<u32>,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub position: usize,
    pub player_name: String,
    pub total_score: u32,
    pub last_game_points: u32,
    pub games_won: u32,
}

/// Public, client-safe projection of a tournament, broadcast as
/// `tourney/updated`. Carries no hands or private per-seat data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientTourneyState {
    pub status: Status,
    pub seats: Vec<ClientSeat>,
    pub target_score: u32,
    pub current_game_number: u32,
    pub ready_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSeat {
    pub position: usize,
    pub player_name: Option<String>,
    pub score: u32,
    pub games_won: u32,
    pub ready: bool,
    pub is_bot: bool,
}

/// The singleton tournament. Identified by the reserved id `"global"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    pub status: Status,
    pub target_score: u32,
    pub seats: [Seat; 4],
    pub current_game: Option<Game>,
    pub game_history: Vec<GameHistoryEntry>,
    pub version: u64,
}

impl Tournament {
    pub fn new(target_score: u32) -> Self {
        Tournament {
            status: Status::Waiting,
            target_score,
            seats: std::array::from_fn(Seat::empty),
            current_game: None,
            game_history: Vec::new(),
            version: 0,
        }
    }

    pub fn occupied_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_occupied()).count()
    }

    fn find_seat_by_player(&self, player_id: &str) -> Option<usize> {
        self.seats
            .iter()
            .position(|s| s.player_id.as_deref() == Some(player_id))
    }

    /// Seats `player_id`, reconnecting into an existing seat if already
    /// seated. Returns the claimed seat position.
    pub fn claim_seat(
        mut self,
        player_id: &str,
        player_name: &str,
        connection_id: &str,
        seat_position: Option<usize>,
    ) -> Result<(Self, usize), ErrorCode> {
        if !matches!(self.status, Status::Waiting | Status::Starting) {
            return Err(ErrorCode::TourneyInProgress);
        }

        if let Some(existing) = self.find_seat_by_player(player_id) {
            let seat = &mut self.seats[existing];
            seat.connection_id = Some(connection_id.to_string());
            seat.disconnected_at = None;
            return Ok((self, existing));
        }

        let position = match seat_position {
            Some(pos) => {
                if pos >= 4 {
                    return Err(ErrorCode::InvalidSeat);
                }
                if self.seats[pos].is_occupied() {
                    return Err(ErrorCode::SeatTaken);
                }
                pos
            }
            None => self
                .seats
                .iter()
                .position(|s| !s.is_occupied())
                .ok_or(ErrorCode::TourneyFull)?,
        };

        self.seats[position].claim_human(
            player_id.to_string(),
            player_name.to_string(),
            connection_id.to_string(),
        );
        self.advance_to_starting_if_full();
        Ok((self, position))
    }

    pub fn leave_tourney(mut self, player_id: &str) -> Result<Self, ErrorCode> {
        if !matches!(self.status, Status::Waiting | Status::Starting) {
            return Err(ErrorCode::TourneyInProgress);
        }
        let position = self
            .find_seat_by_player(player_id)
            .ok_or(ErrorCode::NotInTourney)?;
        self.seats[position].clear();
        if self.status == Status::Starting && self.occupied_count() < 4 {
            self.status = Status::Waiting;
        }
        Ok(self)
    }

    pub fn add_bot(
        mut self,
        seat_position: usize,
        bot_profile: Option<String>,
    ) -> Result<Self, ErrorCode> {
        if !matches!(self.status, Status::Waiting | Status::Starting) {
            return Err(ErrorCode::TourneyInProgress);
        }
        if seat_position >= 4 {
            return Err(ErrorCode::InvalidSeat);
        }
        if self.seats[seat_position].is_occupied() {
            return Err(ErrorCode::SeatTaken);
        }
        let bot_id = format!("bot_{}", random_hex(8));
        let bot_name = format!("Bot_{}", seat_position + 1);
        self.seats[seat_position].claim_bot(bot_id, bot_name, bot_profile);
        self.advance_to_starting_if_full();
        Ok(self)
    }

    pub fn kick_bot(mut self, seat_position: usize) -> Result<Self, ErrorCode> {
        if !matches!(self.status, Status::Waiting | Status::Starting) {
            return Err(ErrorCode::TourneyInProgress);
        }
        if seat_position >= 4 {
            return Err(ErrorCode::InvalidSeat);
        }
        let seat = &self.seats[seat_position];
        if !seat.is_occupied() {
            return Err(ErrorCode::SeatEmpty);
        }
        if !seat.is_bot {
            return Err(ErrorCode::NotABot);
        }
        self.seats[seat_position].clear();
        if self.status == Status::Starting {
            self.status = Status::Waiting;
        }
        Ok(self)
    }

    fn advance_to_starting_if_full(&mut self) {
        if self.status == Status::Waiting && self.occupied_count() == 4 {
            self.status = Status::Starting;
        }
    }

    /// Marks `player_id` ready/unready. If this makes every occupied seat
    /// ready (and the tournament is full), starts the next game. Returns
    /// whether a game was just started.
    pub fn set_ready(mut self, player_id: &str, ready: bool) -> Result<(Self, bool), ErrorCode> {
        if !matches!(self.status, Status::Starting | Status::BetweenGames) {
            return Err(ErrorCode::InvalidState);
        }
        let position = self
            .find_seat_by_player(player_id)
            .ok_or(ErrorCode::NotInTourney)?;
        self.seats[position].ready = ready;

        let all_ready = self.occupied_count() == 4
            && self.seats.iter().all(|s| !s.is_occupied() || s.ready);
        if all_ready {
            self = self.start_game();
            Ok((self, true))
        } else {
            Ok((self, false))
        }
    }

    fn start_game(mut self) -> Self {
        let player_ids = std::array::from_fn(|i| {
            self.seats[i].player_id.clone().unwrap_or_default()
        });
        self.current_game = Some(Game::deal(player_ids));
        self.status = Status::InProgress;
        for seat in &mut self.seats {
            seat.ready = false;
        }
        self
    }

    pub fn current_game_number(&self) -> u32 {
        self.game_history.len() as u32 + 1
    }

    /// Awards placement points for `win_order` (already-complete, length 4),
    /// appends a history entry stamped with `now`, and transitions to
    /// `BetweenGames` or `Completed`. Returns whether the tournament ended.
    pub fn complete_game(
        mut self,
        win_order: &[usize],
        now: i64,
    ) -> Result<(Self, bool), ErrorCode> {
        if self.current_game.is_none() {
            return Err(ErrorCode::NoActiveGame);
        }
        let points_awarded: Vec<u32> = win_order
            .iter()
            .enumerate()
            .map(|(finish_pos, _)| PLACEMENT_POINTS.get(finish_pos).copied().unwrap_or(0))
            .collect();
        for (finish_pos, &seat) in win_order.iter().enumerate() {
            let points = points_awarded[finish_pos];
            self.seats[seat].last_game_points = points;
            self.seats[seat].score += points;
            if finish_pos == 0 {
                self.seats[seat].games_won += 1;
            }
        }
        self.game_history.push(GameHistoryEntry {
            game_number: self.current_game_number(),
            win_order: win_order.to_vec(),
            points_awarded,
            timestamp: now,
        });
        self.current_game = None;

        let tournament_complete = self.seats.iter().any(|s| s.score >= self.target_score);
        self.status = if tournament_complete {
            Status::Completed
        } else {
            Status::BetweenGames
        };
        Ok((self, tournament_complete))
    }

    /// Clears any seat disconnected for at least `grace_seconds`. Only acts
    /// while seating is still open; `IN_PROGRESS` disconnects are untouched.
    pub fn cleanup_disconnected_players(mut self, now: i64, grace_seconds: i64) -> Self {
        if !matches!(self.status, Status::Waiting | Status::Starting) {
            return self;
        }
        for seat in &mut self.seats {
            if let Some(disconnected_at) = seat.disconnected_at {
                if now - disconnected_at >= grace_seconds {
                    seat.clear();
                }
            }
        }
        if self.status == Status::Starting && self.occupied_count() < 4 {
            self.status = Status::Waiting;
        }
        self
    }

    pub fn mark_disconnected(&mut self, connection_id: &str, now: i64) {
        if !matches!(self.status, Status::Waiting | Status::Starting) {
            return;
        }
        if let Some(seat) = self
            .seats
            .iter_mut()
            .find(|s| s.connection_id.as_deref() == Some(connection_id))
        {
            seat.disconnected_at = Some(now);
        }
    }

    pub fn get_leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<_> = self
            .seats
            .iter()
            .filter(|s| s.is_occupied())
            .map(|s| LeaderboardEntry {
                position: s.position,
                player_name: s.player_name.clone().unwrap_or_default(),
                total_score: s.score,
                last_game_points: s.last_game_points,
                games_won: s.games_won,
            })
            .collect();
        entries.sort_by(|a, b| b.total_score.cmp(&a.total_score));
        entries
    }

    pub fn winner_position(&self) -> Option<usize> {
        self.seats
            .iter()
            .filter(|s| s.is_occupied())
            .max_by_key(|s| s.score)
            .map(|s| s.position)
    }

    pub fn to_client_state(&self) -> ClientTourneyState {
        ClientTourneyState {
            status: self.status,
            seats: self
                .seats
                .iter()
                .map(|s| ClientSeat {
                    position: s.position,
                    player_name: s.player_name.clone(),
                    score: s.score,
                    games_won: s.games_won,
                    ready: s.ready,
                    is_bot: s.is_bot,
                })
                .collect(),
            target_score: self.target_score,
            current_game_number: self.current_game_number(),
            ready_count: self.seats.iter().filter(|s| s.is_occupied() && s.ready).count(),
        }
    }
}

fn random_hex(len: usize) -> String {
    use rand::Rng;
    const HEX: &[u8] = b"0123456789abcdef";
    let mut rng = rand::rng();
    (0..len)
        .map(|_| HEX[rng.random_range(0..HEX.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_tourney() -> Tournament {
        let mut t = Tournament::new(21);
        for i in 0..4 {
            let (next, _) = t
                .clone()
                .claim_seat(&format!("p{i}"), &format!("Player{i}"), &format!("c{i}"), Some(i))
                .unwrap();
            t = next;
        }
        t
    }

    #[test]
    fn claiming_all_four_seats_starts_the_tournament() {
        let t = full_tourney();
        assert_eq!(t.status, Status::Starting);
    }

    #[test]
    fn claiming_a_taken_seat_fails() {
        let t = full_tourney();
        let err = t.claim_seat("new_player", "New", "cX", Some(0)).unwrap_err();
        assert_eq!(err, ErrorCode::SeatTaken);
    }

    #[test]
    fn reclaiming_same_player_just_refreshes_connection() {
        let t = full_tourney();
        let before_score = t.seats[0].score;
        let (t2, pos) = t.claim_seat("p0", "Player0", "new-conn", None).unwrap();
        assert_eq!(pos, 0);
        assert_eq!(t2.seats[0].connection_id.as_deref(), Some("new-conn"));
        assert_eq!(t2.seats[0].score, before_score);
    }

    #[test]
    fn readying_all_four_starts_a_game() {
        let mut t = full_tourney();
        let mut started = false;
        for i in 0..4 {
            let (next, did_start) = t.set_ready(&format!("p{i}"), true).unwrap();
            t = next;
            started = did_start;
        }
        assert!(started);
        assert_eq!(t.status, Status::InProgress);
        assert!(t.current_game.is_some());
    }

    #[test]
    fn completing_a_game_below_target_goes_to_between_games() {
        let mut t = full_tourney();
        for i in 0..4 {
            let (next, _) = t.set_ready(&format!("p{i}"), true).unwrap();
            t = next;
        }
        let (t2, complete) = t.complete_game(&[0, 1, 2, 3], 1_700_000_000).unwrap();
        assert!(!complete);
        assert_eq!(t2.status, Status::BetweenGames);
        assert_eq!(t2.seats[0].score, 4);
        assert_eq!(t2.seats[0].games_won, 1);
        assert_eq!(t2.game_history.len(), 1);
        assert_eq!(t2.game_history[0].timestamp, 1_700_000_000);
    }

    #[test]
    fn reaching_target_score_completes_the_tournament() {
        let mut t = full_tourney();
        for i in 0..4 {
            let (next, _) = t.set_ready(&format!("p{i}"), true).unwrap();
            t = next;
        }
        t.seats[0].score = 20;
        let (t2, complete) = t.complete_game(&[0, 1, 2, 3], 1).unwrap();
        assert!(complete);
        assert_eq!(t2.status, Status::Completed);
        assert_eq!(t2.winner_position(), Some(0));
    }

    #[test]
    fn points_awarded_is_ordered_by_finish_not_by_seat() {
        let mut t = full_tourney();
        for i in 0..4 {
            let (next, _) = t.set_ready(&format!("p{i}"), true).unwrap();
            t = next;
        }
        // Seat 2 finished first, seat 0 second, seat 3 third, seat 1 last.
        let (t2, _) = t.complete_game(&[2, 0, 3, 1], 1).unwrap();
        let entry = &t2.game_history[0];
        assert_eq!(entry.win_order, vec![2, 0, 3, 1]);
        assert_eq!(entry.points_awarded, vec![4, 2, 1, 0]);
        assert_eq!(t2.seats[2].score, 4);
        assert_eq!(t2.seats[0].score, 2);
        assert_eq!(t2.seats[3].score, 1);
        assert_eq!(t2.seats[1].score, 0);
        assert_eq!(t2.seats[2].games_won, 1);
    }

    #[test]
    fn disconnect_cleanup_only_acts_after_grace_period() {
        let mut t = full_tourney();
        t.status = Status::Waiting;
        t.seats[0].clear();
        let (t, _) = t.claim_seat("p0", "Player0", "c0", Some(0)).unwrap();
        let mut t = t;
        t.seats[0].disconnected_at = Some(100);
        let still_seated = t.clone().cleanup_disconnected_players(102, 5);
        assert!(still_seated.seats[0].is_occupied());
        let cleared = t.cleanup_disconnected_players(106, 5);
        assert!(!cleared.seats[0].is_occupied());
    }
}
