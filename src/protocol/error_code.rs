use serde::{Deserialize, Serialize};

/// Machine-readable error tag sent to clients in an `error` frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Unauthorized,
    InvalidJson,
    UnknownAction,
    TourneyInProgress,
    TourneyFull,
    SeatTaken,
    InvalidSeat,
    NotInTourney,
    InvalidState,
    SeatEmpty,
    NotABot,
    MissingSeatPosition,
    NoActiveGame,
    NotYourTurn,
    AlreadyPassed,
    InvalidCombo,
    CantOpenWithBomb,
    CantBeatLastPlay,
    CantPass,
    InternalError,
    NotImplemented,
}

impl ErrorCode {
    /// A short human-readable message suitable for display to a player.
    pub fn message(self) -> &'static str {
        match self {
            ErrorCode::Unauthorized => "connection is not associated with a player",
            ErrorCode::InvalidJson => "could not parse message",
            ErrorCode::UnknownAction => "unrecognized action",
            ErrorCode::TourneyInProgress => "a game is currently in progress",
            ErrorCode::TourneyFull => "the tournament already has four seated players",
            ErrorCode::SeatTaken => "that seat is already occupied",
            ErrorCode::InvalidSeat => "seat position must be 0..3",
            ErrorCode::NotInTourney => "you are not seated in this tournament",
            ErrorCode::InvalidState => "that action is not valid in the current tournament state",
            ErrorCode::SeatEmpty => "that seat is empty",
            ErrorCode::NotABot => "that seat is not occupied by a bot",
            ErrorCode::MissingSeatPosition => "seatPosition is required",
            ErrorCode::NoActiveGame => "there is no game in progress",
            ErrorCode::NotYourTurn => "it is not your turn",
            ErrorCode::AlreadyPassed => "you have already passed this round",
            ErrorCode::InvalidCombo => "those cards do not form a legal combination",
            ErrorCode::CantOpenWithBomb => "you cannot open a round with a bomb",
            ErrorCode::CantBeatLastPlay => "that play does not beat the last play",
            ErrorCode::CantPass => "you cannot pass while holding the lead",
            ErrorCode::InternalError => "internal server error",
            ErrorCode::NotImplemented => "not implemented",
        }
    }
}
