use crate::connections::get_connection;
use crate::protocol::ErrorCode;

use super::context::Context;

/// Resolves the player bound to `connection_id`, the step every action
/// handler except `ping` and the debug actions needs before touching
/// tournament state.
pub async fn resolve_player_id(ctx: &Context, connection_id: &str) -> Result<String, ErrorCode> {
    get_connection(&ctx.connections, connection_id)
        .await
        .map(|c| c.player_id)
        .ok_or(ErrorCode::Unauthorized)
}

pub async fn resolve_player_name(ctx: &Context, connection_id: &str) -> Result<String, ErrorCode> {
    get_connection(&ctx.connections, connection_id)
        .await
        .map(|c| c.player_name)
        .ok_or(ErrorCode::Unauthorized)
}
