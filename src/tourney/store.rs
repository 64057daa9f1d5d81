use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::protocol::ErrorCode;

use super::state::Tournament;

/// Reserved singleton id; there is exactly one tournament in this process.
/// The store keys its single record on it, the same way an external
/// key-value table would key a `tourney_id="global"` row.
pub const GLOBAL_TOURNEY_ID: &str = "global";

/// Async, lock-guarded holder of the singleton tournament, keyed the same
/// way [`crate::connections::ConnectionRegistry`] keys its connections —
/// a `HashMap` behind an `Arc<RwLock<_>>`, manipulated only through free
/// functions so call sites control exactly how long the lock is held.
/// There is only ever one key, [`GLOBAL_TOURNEY_ID`], but keeping the map
/// shape matches the external store contract this is standing in for.
#[derive(Clone)]
pub struct TourneyStore {
    inner: Arc<RwLock<HashMap<String, Tournament>>>,
}

pub fn new_tourney_store(target_score: u32) -> TourneyStore {
    let mut table = HashMap::new();
    table.insert(GLOBAL_TOURNEY_ID.to_string(), Tournament::new(target_score));
    TourneyStore {
        inner: Arc::new(RwLock::new(table)),
    }
}

pub async fn get_tournament_from_store(store: &TourneyStore) -> Tournament {
    store
        .inner
        .read()
        .await
        .get(GLOBAL_TOURNEY_ID)
        .cloned()
        .expect("the global tournament row is seeded by new_tourney_store and never deleted")
}

/// Loads the tournament, applies a pure `transformation`, and writes the
/// result back, bumping `version` by one. The whole load-mutate-save cycle
/// runs under a single write-lock acquisition, which in this in-process
/// store is equivalent to a successful first-attempt conditional write on
/// `version` — the same discipline a remote, multi-writer store would need
/// an explicit compare-and-swap retry loop for.
pub async fn transform_tournament_in_store<F, T>(
    store: &TourneyStore,
    transformation: F,
) -> Result<T, ErrorCode>
where
    F: FnOnce(Tournament) -> Result<(Tournament, T), ErrorCode>,
{
    let mut guard = store.inner.write().await;
    let current = guard
        .get(GLOBAL_TOURNEY_ID)
        .cloned()
        .expect("the global tournament row is seeded by new_tourney_store and never deleted");
    let (mut next, result) = transformation(current)?;
    next.version += 1;
    guard.insert(GLOBAL_TOURNEY_ID.to_string(), next);
    Ok(result)
}
