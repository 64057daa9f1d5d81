use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Connections live for two hours past their last `$connect`.
pub const CONNECTION_TTL_SECONDS: i64 = 2 * 60 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub connection_id: String,
    pub player_id: String,
    pub player_name: String,
    pub connected_at: i64,
    pub last_ping: i64,
    pub ttl: i64,
}

impl Connection {
    pub fn new(connection_id: String, player_id: String, player_name: String, now: i64) -> Self {
        Connection {
            connection_id,
            player_id,
            player_name,
            connected_at: now,
            last_ping: now,
            ttl: now + CONNECTION_TTL_SECONDS,
        }
    }

    fn is_expired(&self, now: i64) -> bool {
        now >= self.ttl
    }
}

#[derive(Debug, Default)]
struct RegistryState {
    connections: HashMap<String, Connection>,
}

/// Async, lock-guarded connection→player map. Functions operate on the
/// shared state directly rather than through methods on a lock-holding
/// type, so every call site controls exactly how long the lock is held.
#[derive(Clone)]
pub struct ConnectionRegistry {
    inner: Arc<RwLock<RegistryState>>,
}

pub fn new_connection_registry() -> ConnectionRegistry {
    ConnectionRegistry {
        inner: Arc::new(RwLock::new(RegistryState::default())),
    }
}

pub async fn put_connection(registry: &ConnectionRegistry, connection: Connection) {
    let mut state = registry.inner.write().await;
    state
        .connections
        .insert(connection.connection_id.clone(), connection);
}

pub async fn get_connection(registry: &ConnectionRegistry, connection_id: &str) -> Option<Connection> {
    let state = registry.inner.read().await;
    state.connections.get(connection_id).cloned()
}

pub async fn delete_connection(registry: &ConnectionRegistry, connection_id: &str) {
    let mut state = registry.inner.write().await;
    state.connections.remove(connection_id);
}

pub async fn touch_connection(registry: &ConnectionRegistry, connection_id: &str, now: i64) {
    let mut state = registry.inner.write().await;
    if let Some(conn) = state.connections.get_mut(connection_id) {
        conn.last_ping = now;
    }
}

/// All live connections, opportunistically reaping any past their TTL.
pub async fn scan_connections(registry: &ConnectionRegistry, now: i64) -> Vec<Connection> {
    let mut state = registry.inner.write().await;
    state.connections.retain(|_, c| !c.is_expired(now));
    state.connections.values().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let registry = new_connection_registry();
        put_connection(&registry, Connection::new("c1".into(), "p1".into(), "Alice".into(), 1000)).await;
        let found = get_connection(&registry, "c1").await.unwrap();
        assert_eq!(found.player_id, "p1");
        assert_eq!(found.ttl, 1000 + CONNECTION_TTL_SECONDS);
    }

    #[tokio::test]
    async fn scan_reaps_expired_connections() {
        let registry = new_connection_registry();
        put_connection(&registry, Connection::new("c1".into(), "p1".into(), "Alice".into(), 0)).await;
        let still_there = scan_connections(&registry, 10).await;
        assert_eq!(still_there.len(), 1);
        let after_ttl = scan_connections(&registry, CONNECTION_TTL_SECONDS + 1).await;
        assert!(after_ttl.is_empty());
        assert!(get_connection(&registry, "c1").await.is_none());
    }

    #[tokio::test]
    async fn delete_removes_the_connection() {
        let registry = new_connection_registry();
        put_connection(&registry, Connection::new("c1".into(), "p1".into(), "Alice".into(), 0)).await;
        delete_connection(&registry, "c1").await;
        assert!(get_connection(&registry, "c1").await.is_none());
    }
}
