//! # Thirteen Tournament Server
//!
//! Server-authoritative core for a four-seat online tournament of the
//! trick-taking shedding card game Thirteen (Tiến Lên): the tournament
//! state machine, the game engine, the greedy bot policy, and the
//! WebSocket transport and action dispatcher that tie them to connected
//! clients.
//!
//! ## Usage
//!
//! ```rust
//! use thirteen_tourney::{
//!     dispatcher::Context,
//!     servers::{WsServer, WsConfig},
//! };
//! ```

// ============================================================================
// PUBLIC API MODULES
// ============================================================================

/// Card encoding, combo classification, and the beat relation.
pub mod cards;

/// The Thirteen game engine: dealing, legality, turn advancement.
pub mod game;

/// The greedy bot policy built on the game engine.
pub mod bot;

/// The tournament state machine: seating, readiness, scoring, lifecycle.
pub mod tourney;

/// The connection registry: connection-id to player binding and TTL.
pub mod connections;

/// Wire format: inbound frames, outbound frames, error codes.
pub mod protocol;

/// Fan-out of server frames to connected clients.
pub mod broadcast;

/// Action routing: parses frames and invokes the per-action handlers.
pub mod dispatcher;

/// The WebSocket transport server.
pub mod servers;

// ============================================================================
// INTERNAL MODULES (not exposed publicly)
// ============================================================================

mod logging;

pub use logging::{init_test_logging, setup_logging};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Crate-wide error type distinguishing client-caused rule violations from
/// transport transience (a send to a connection that is already gone) and
/// internal faults (store or serialization failures).
#[derive(Debug, thiserror::Error)]
pub enum ThirteenError {
    /// A client-caused rule violation, reported back to the caller alone.
    #[error("rule violation: {0:?}")]
    Rule(protocol::ErrorCode),

    /// An outbound send failed for a reason other than "connection gone".
    #[error("transport error: {0}")]
    Transport(String),

    /// A store/serialization fault or other condition that should be
    /// unreachable under correct operation.
    #[error("internal error: {0}")]
    Internal(String),

    /// Bind/accept failure at startup.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<protocol::ErrorCode> for ThirteenError {
    fn from(code: protocol::ErrorCode) -> Self {
        ThirteenError::Rule(code)
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ThirteenError>;

// ============================================================================
// LIBRARY VERSION INFO
// ============================================================================

/// Library version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description.
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
