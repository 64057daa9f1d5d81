//! Black-box integration tests over the dispatcher's public surface: every
//! test below only sends JSON frames through [`dispatch`] and reads back
//! outbound frames through a registered broadcast channel, the same way a
//! real WebSocket client would.

use thirteen_tourney::broadcast::register_connection;
use thirteen_tourney::connections::{put_connection, Connection};
use thirteen_tourney::dispatcher::{dispatch, now, Context};
use thirteen_tourney::tourney::{get_tournament_from_store, Status};

/// Registers a connection with both the connection registry (so the
/// dispatcher can resolve `player_id`) and the broadcast hub (so the test
/// can observe outbound frames), mirroring what `servers::ws` does on
/// `$connect`.
async fn connect(ctx: &Context, connection_id: &str, player_id: &str) -> tokio::sync::mpsc::UnboundedReceiver<String> {
    put_connection(
        &ctx.connections,
        Connection::new(connection_id.to_string(), player_id.to_string(), player_id.to_string(), now()),
    )
    .await;
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    register_connection(&ctx.hub, connection_id.to_string(), tx).await;
    rx
}

async fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<String>) -> Vec<String> {
    let mut out = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        out.push(frame);
    }
    out
}

#[tokio::test]
async fn four_players_seating_and_readying_starts_a_game() {
    let ctx = Context::new(21);
    let mut rxs = Vec::new();
    for i in 0..4 {
        let conn = format!("c{i}");
        let player = format!("p{i}");
        let mut rx = connect(&ctx, &conn, &player).await;
        dispatch(&ctx, &conn, r#"{"action":"tourney/claim_seat","payload":{}}"#).await;
        rxs.push((conn, player, drain(&mut rx).await));
    }

    let tournament = get_tournament_from_store(&ctx.tourneys).await;
    assert_eq!(tournament.status, Status::Starting);
    assert_eq!(tournament.occupied_count(), 4);

    for (conn, _player, _) in &rxs {
        dispatch(&ctx, conn, r#"{"action":"tourney/ready","payload":{}}"#).await;
    }

    let tournament = get_tournament_from_store(&ctx.tourneys).await;
    assert_eq!(tournament.status, Status::InProgress);
    assert!(tournament.current_game.is_some());
}

#[tokio::test]
async fn quick_start_seats_a_human_and_fills_the_rest_with_bots() {
    let ctx = Context::new(21);
    let mut rx = connect(&ctx, "c0", "p0").await;

    dispatch(&ctx, "c0", r#"{"action":"debug/quick_start","payload":{"seatPosition":0}}"#).await;

    let tournament = get_tournament_from_store(&ctx.tourneys).await;
    assert_eq!(tournament.status, Status::InProgress);
    assert_eq!(tournament.seats[0].player_id.as_deref(), Some("p0"));
    assert_eq!(tournament.seats.iter().filter(|s| s.is_bot).count(), 3);

    let frames = drain(&mut rx).await;
    assert!(frames.iter().any(|f| f.contains("tourney/updated")));
    assert!(frames.iter().any(|f| f.contains("game/started")));
}

#[tokio::test]
async fn a_fifth_claim_is_rejected_once_the_table_is_full() {
    let ctx = Context::new(21);
    for i in 0..4 {
        let conn = format!("c{i}");
        let player = format!("p{i}");
        let _ = connect(&ctx, &conn, &player).await;
        dispatch(&ctx, &conn, r#"{"action":"tourney/claim_seat","payload":{}}"#).await;
    }

    let mut rx = connect(&ctx, "c4", "p4").await;
    dispatch(&ctx, "c4", r#"{"action":"tourney/claim_seat","payload":{}}"#).await;

    let frames = drain(&mut rx).await;
    assert!(frames.iter().any(|f| f.contains("TOURNEY_FULL")));
}

#[tokio::test]
async fn ping_is_answered_with_a_pong_carrying_the_same_timestamp() {
    let ctx = Context::new(21);
    let mut rx = connect(&ctx, "c0", "p0").await;

    dispatch(&ctx, "c0", r#"{"action":"ping","payload":{"timestamp":12345}}"#).await;

    let frames = drain(&mut rx).await;
    assert!(frames.iter().any(|f| f.contains("\"type\":\"pong\"") && f.contains("12345")));
}

#[tokio::test]
async fn an_unauthorized_connection_gets_an_error_not_a_broadcast() {
    let ctx = Context::new(21);
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    register_connection(&ctx.hub, "ghost".to_string(), tx).await;

    dispatch(&ctx, "ghost", r#"{"action":"tourney/claim_seat","payload":{}}"#).await;

    let frames = drain(&mut rx).await;
    assert!(frames.iter().any(|f| f.contains("UNAUTHORIZED")));
    let tournament = get_tournament_from_store(&ctx.tourneys).await;
    assert_eq!(tournament.occupied_count(), 0);
}

#[tokio::test]
async fn an_unknown_action_does_not_panic_and_reports_the_caller_only() {
    let ctx = Context::new(21);
    let mut rx = connect(&ctx, "c0", "p0").await;

    dispatch(&ctx, "c0", r#"{"action":"tourney/teleport","payload":{}}"#).await;

    let frames = drain(&mut rx).await;
    assert!(frames.iter().any(|f| f.contains("UNKNOWN_ACTION")));
}
