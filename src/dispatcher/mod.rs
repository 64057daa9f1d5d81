//! Routes inbound frames to the per-action handlers in [`handlers`] and
//! replies with an `error` frame to the caller alone on any rule violation.

mod connection_utils;
mod context;
mod handlers;
mod response_builders;

pub use context::{now, Context};

use crate::broadcast::send_to;
use crate::protocol::{
    AddBotPayload, ClaimSeatPayload, ClientFrame, ErrorCode, KickBotPayload, PingPayload,
    PlayCardsPayload, QuickStartPayload, ServerFrame,
};

/// Parses one inbound WebSocket text frame and routes it to its handler.
/// Malformed JSON and unrecognized actions are reported to the caller the
/// same way a rule violation is: an `error` frame, nothing broadcast.
pub async fn dispatch(ctx: &Context, connection_id: &str, raw: &str) {
    let frame: ClientFrame = match serde_json::from_str(raw) {
        Ok(frame) => frame,
        Err(e) => {
            log::warn!("connection {connection_id} sent invalid JSON: {e}");
            send_to(&ctx.hub, connection_id, &ServerFrame::error(ErrorCode::InvalidJson)).await;
            return;
        }
    };

    log::debug!("dispatching {} from {connection_id}", frame.action);

    let result = match frame.action.as_str() {
        "ping" => {
            with_payload(frame.payload, |p: PingPayload| handlers::handle_ping(ctx, connection_id, p)).await
        }
        "tourney/info" => handlers::handle_tourney_info(ctx, connection_id).await,
        "tourney/claim_seat" => {
            with_payload(frame.payload, |p: ClaimSeatPayload| {
                handlers::handle_claim_seat(ctx, connection_id, p)
            })
            .await
        }
        "tourney/leave" => handlers::handle_leave(ctx, connection_id).await,
        "tourney/ready" => handlers::handle_ready(ctx, connection_id).await,
        "tourney/add_bot" => {
            with_payload(frame.payload, |p: AddBotPayload| {
                handlers::handle_add_bot(ctx, connection_id, p)
            })
            .await
        }
        "tourney/kick_bot" => {
            with_payload(frame.payload, |p: KickBotPayload| {
                handlers::handle_kick_bot(ctx, connection_id, p)
            })
            .await
        }
        "game/play" => {
            with_payload(frame.payload, |p: PlayCardsPayload| {
                handlers::handle_play(ctx, connection_id, p)
            })
            .await
        }
        "game/pass" => handlers::handle_pass(ctx, connection_id).await,
        "debug/reset" => handlers::handle_debug_reset(ctx).await,
        "debug/quick_start" => {
            let seat_position = serde_json::from_value::<QuickStartPayload>(frame.payload)
                .map(|p| p.seat_position)
                .unwrap_or(None);
            handlers::handle_debug_quick_start(ctx, connection_id, seat_position).await
        }
        other => {
            log::warn!("connection {connection_id} sent unknown action {other}");
            Err(ErrorCode::UnknownAction)
        }
    };

    if let Err(code) = result {
        send_to(&ctx.hub, connection_id, &ServerFrame::error(code)).await;
    }
}

/// Deserializes `payload` into `P` before calling `f`; a shape mismatch is
/// reported the same way any other malformed frame is.
async fn with_payload<P, F, Fut>(payload: serde_json::Value, f: F) -> Result<(), ErrorCode>
where
    P: serde::de::DeserializeOwned,
    F: FnOnce(P) -> Fut,
    Fut: std::future::Future<Output = Result<(), ErrorCode>>,
{
    let parsed: P = serde_json::from_value(payload).map_err(|_| ErrorCode::InvalidJson)?;
    f(parsed).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connections::{put_connection, Connection};

    #[tokio::test]
    async fn malformed_json_does_not_panic() {
        let ctx = Context::new(21);
        dispatch(&ctx, "c0", "not json").await;
    }

    #[tokio::test]
    async fn unknown_action_is_reported_not_dispatched() {
        let ctx = Context::new(21);
        put_connection(&ctx.connections, Connection::new("c0".into(), "p0".into(), "P0".into(), 0)).await;
        dispatch(&ctx, "c0", r#"{"action":"does/not_exist","payload":{}}"#).await;
    }

    #[tokio::test]
    async fn ping_round_trips_through_dispatch() {
        let ctx = Context::new(21);
        put_connection(&ctx.connections, Connection::new("c0".into(), "p0".into(), "P0".into(), 0)).await;
        dispatch(&ctx, "c0", r#"{"action":"ping","payload":{"timestamp":7}}"#).await;
    }
}
