use serde::{Deserialize, Serialize};

use crate::cards::{Card, Play};
use crate::tourney::{ClientTourneyState, LeaderboardEntry};

use super::error_code::ErrorCode;

/// Raw inbound WebSocket frame: `{"action": "...", "payload": {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientFrame {
    pub action: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PingPayload {
    pub timestamp: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimSeatPayload {
    pub seat_position: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBotPayload {
    pub seat_position: Option<usize>,
    #[serde(default)]
    pub bot_profile: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KickBotPayload {
    pub seat_position: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayCardsPayload {
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickStartPayload {
    pub seat_position: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PongPayload {
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorPayload {
    pub fn from_code(code: ErrorCode) -> Self {
        ErrorPayload {
            code,
            message: code.message().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub position: usize,
    pub player_name: Option<String>,
    pub is_bot: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStartedPayload {
    pub your_position: usize,
    pub your_hand: Vec<Card>,
    pub current_player: usize,
    pub players: Vec<PlayerSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameUpdatedPayload {
    pub current_player: usize,
    pub last_play: Option<Play>,
    pub passed_players: [bool; 4],
    pub hand_counts: [usize; 4],
    pub your_hand: Vec<Card>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOverPayload {
    pub win_order: Vec<usize>,
    pub points_awarded: Vec<u32>,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub tourney_complete: bool,
    pub winner: Option<usize>,
}

/// Outbound server frame, tagged the same way the client-facing action
/// names read: `{"type": "...", "payload": {...}}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerFrame {
    #[serde(rename = "pong")]
    Pong(PongPayload),
    #[serde(rename = "error")]
    Error(ErrorPayload),
    #[serde(rename = "tourney/updated")]
    TourneyUpdated(ClientTourneyState),
    #[serde(rename = "game/started")]
    GameStarted(GameStartedPayload),
    #[serde(rename = "game/updated")]
    GameUpdated(GameUpdatedPayload),
    #[serde(rename = "game/over")]
    GameOver(GameOverPayload),
}

impl ServerFrame {
    pub fn error(code: ErrorCode) -> Self {
        ServerFrame::Error(ErrorPayload::from_code(code))
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            log::error!("failed to serialize outbound frame: {e}");
            r#"{"type":"error","payload":{"code":"INTERNAL_ERROR","message":"internal server error"}}"#.to_string()
        })
    }
}
