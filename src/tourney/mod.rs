//! The tournament state machine: seating, readiness, game lifecycle, scoring.

mod seat;
mod state;
mod store;

pub use seat::Seat;
pub use state::{
    ClientSeat, ClientTourneyState, GameHistoryEntry, LeaderboardEntry, Status, Tournament,
    DEFAULT_DISCONNECT_GRACE_SECONDS, DEFAULT_TARGET_SCORE,
};
pub use store::{
    get_tournament_from_store, new_tourney_store, transform_tournament_in_store, TourneyStore,
};
