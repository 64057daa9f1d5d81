use serde::{Deserialize, Serialize};

/// One of the four fixed positions at the table. `position` never changes
/// once a `Seat` exists; everything else is cleared when the seat empties.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub position: usize,
    pub player_id: Option<String>,
    pub player_name: Option<String>,
    pub connection_id: Option<String>,
    pub score: u32,
    pub games_won: u32,
    pub last_game_points: u32,
    pub ready: bool,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub bot_profile: Option<String>,
    #[serde(default)]
    pub disconnected_at: Option<i64>,
}

impl Seat {
    pub fn empty(position: usize) -> Self {
        Seat {
            position,
            player_id: None,
            player_name: None,
            connection_id: None,
            score: 0,
            games_won: 0,
            last_game_points: 0,
            ready: false,
            is_bot: false,
            bot_profile: None,
            disconnected_at: None,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.player_id.is_some()
    }

    pub fn claim_human(&mut self, player_id: String, player_name: String, connection_id: String) {
        self.player_id = Some(player_id);
        self.player_name = Some(player_name);
        self.connection_id = Some(connection_id);
        self.score = 0;
        self.games_won = 0;
        self.last_game_points = 0;
        self.ready = false;
        self.is_bot = false;
        self.bot_profile = None;
        self.disconnected_at = None;
    }

    pub fn claim_bot(&mut self, player_id: String, player_name: String, profile: Option<String>) {
        self.player_id = Some(player_id);
        self.player_name = Some(player_name);
        self.connection_id = None;
        self.score = 0;
        self.games_won = 0;
        self.last_game_points = 0;
        self.ready = true;
        self.is_bot = true;
        self.bot_profile = profile;
        self.disconnected_at = None;
    }

    pub fn clear(&mut self) {
        let position = self.position;
        *self = Seat::empty(position);
    }
}
