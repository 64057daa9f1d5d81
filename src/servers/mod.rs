//! The transport server binding the dispatcher to a network socket.

mod ws;

pub use ws::{WsConfig, WsServer};
