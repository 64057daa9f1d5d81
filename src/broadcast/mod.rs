//! Fan-out of server frames to connected clients, with per-seat privacy.

mod hub;

pub use hub::{
    broadcast_game_over, broadcast_game_started, broadcast_game_updated, broadcast_tourney_updated,
    deregister_connection, new_broadcast_hub, register_connection, send_to, BroadcastHub,
};
