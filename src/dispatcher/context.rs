use crate::broadcast::{new_broadcast_hub, BroadcastHub};
use crate::connections::{new_connection_registry, ConnectionRegistry};
use crate::tourney::{new_tourney_store, TourneyStore};

/// Everything a dispatched action needs: the shared stores and the
/// broadcast hub. Cloning a `Context` is cheap — every field is an `Arc`
/// underneath — so each connection task gets its own owned copy.
#[derive(Clone)]
pub struct Context {
    pub tourneys: TourneyStore,
    pub connections: ConnectionRegistry,
    pub hub: BroadcastHub,
}

impl Context {
    pub fn new(target_score: u32) -> Self {
        Context {
            tourneys: new_tourney_store(target_score),
            connections: new_connection_registry(),
            hub: new_broadcast_hub(),
        }
    }
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}
