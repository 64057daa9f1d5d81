//! Connection registry: the connection-id → player binding and its TTL.

mod registry;

pub use registry::{
    delete_connection, get_connection, new_connection_registry, put_connection,
    scan_connections, touch_connection, Connection, ConnectionRegistry, CONNECTION_TTL_SECONDS,
};
