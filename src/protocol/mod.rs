//! Wire format: inbound action frames, outbound server frames, error codes.

mod error_code;
mod frames;

pub use error_code::ErrorCode;
pub use frames::{
    AddBotPayload, ClaimSeatPayload, ClientFrame, ErrorPayload, GameOverPayload,
    GameStartedPayload, GameUpdatedPayload, KickBotPayload, PingPayload, PlayCardsPayload,
    PlayerSummary, PongPayload, QuickStartPayload, ServerFrame,
};
