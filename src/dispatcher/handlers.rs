use crate::bot::run_bot_turns;
use crate::broadcast::{
    broadcast_game_over, broadcast_game_started, broadcast_game_updated, broadcast_tourney_updated,
    send_to,
};
use crate::connections::touch_connection;
use crate::game::Game;
use crate::protocol::{
    AddBotPayload, ClaimSeatPayload, ErrorCode, KickBotPayload, PingPayload, PlayCardsPayload,
    ServerFrame,
};
use crate::tourney::{get_tournament_from_store, transform_tournament_in_store, Tournament, DEFAULT_DISCONNECT_GRACE_SECONDS};

use super::connection_utils::{resolve_player_id, resolve_player_name};
use super::context::{now, Context};
use super::response_builders::pong;

enum PlayOutcome {
    GameUpdated,
    GameOver { win_order: Vec<usize>, tourney_complete: bool },
}

/// Runs any pending bot turns on `game`, then folds it back into `t`: either
/// as the still-running `current_game`, or — if the loop emptied the last
/// active hand — through `complete_game`. Shared by `game/play` and
/// `game/pass` since a bot move triggered by either can end the game.
fn conclude_move(
    mut t: Tournament,
    mut game: Game,
    now_ts: i64,
) -> Result<(Tournament, PlayOutcome), ErrorCode> {
    {
        let is_bot = |p: usize| t.seats[p].is_bot;
        run_bot_turns(&mut game, is_bot);
    }

    if game.is_game_over() {
        if let Some(last) = game.last_active_seat() {
            game.win_order.push(last);
        }
        let win_order = game.win_order.clone();
        t.current_game = Some(game);
        let (t, tourney_complete) = t.complete_game(&win_order, now_ts)?;
        Ok((t, PlayOutcome::GameOver { win_order, tourney_complete }))
    } else {
        t.current_game = Some(game);
        Ok((t, PlayOutcome::GameUpdated))
    }
}

async fn broadcast_play_outcome(ctx: &Context, outcome: PlayOutcome) {
    let tournament = get_tournament_from_store(&ctx.tourneys).await;
    match outcome {
        PlayOutcome::GameUpdated => broadcast_game_updated(&ctx.hub, &tournament).await,
        PlayOutcome::GameOver { win_order, tourney_complete } => {
            let points_awarded = tournament
                .game_history
                .last()
                .map(|entry| entry.points_awarded.clone())
                .unwrap_or_default();
            broadcast_game_over(&ctx.hub, &tournament, win_order, points_awarded, tourney_complete).await;
        }
    }
}

pub async fn handle_ping(ctx: &Context, connection_id: &str, payload: PingPayload) -> Result<(), ErrorCode> {
    touch_connection(&ctx.connections, connection_id, now()).await;
    send_to(&ctx.hub, connection_id, &pong(payload.timestamp)).await;
    Ok(())
}

pub async fn handle_tourney_info(ctx: &Context, connection_id: &str) -> Result<(), ErrorCode> {
    resolve_player_id(ctx, connection_id).await?;
    let now_ts = now();
    transform_tournament_in_store(&ctx.tourneys, |t| {
        Ok((t.cleanup_disconnected_players(now_ts, DEFAULT_DISCONNECT_GRACE_SECONDS), ()))
    })
    .await?;
    let tournament = get_tournament_from_store(&ctx.tourneys).await;
    send_to(
        &ctx.hub,
        connection_id,
        &ServerFrame::TourneyUpdated(tournament.to_client_state()),
    )
    .await;
    Ok(())
}

pub async fn handle_claim_seat(
    ctx: &Context,
    connection_id: &str,
    payload: ClaimSeatPayload,
) -> Result<(), ErrorCode> {
    let player_id = resolve_player_id(ctx, connection_id).await?;
    let player_name = resolve_player_name(ctx, connection_id).await?;
    let now_ts = now();
    transform_tournament_in_store(&ctx.tourneys, |t| {
        let t = t.cleanup_disconnected_players(now_ts, DEFAULT_DISCONNECT_GRACE_SECONDS);
        let (t, position) = t.claim_seat(&player_id, &player_name, connection_id, payload.seat_position)?;
        Ok((t, position))
    })
    .await?;
    let tournament = get_tournament_from_store(&ctx.tourneys).await;
    broadcast_tourney_updated(&ctx.hub, &ctx.connections, &tournament, now_ts).await;
    Ok(())
}

pub async fn handle_leave(ctx: &Context, connection_id: &str) -> Result<(), ErrorCode> {
    let player_id = resolve_player_id(ctx, connection_id).await?;
    transform_tournament_in_store(&ctx.tourneys, |t| t.leave_tourney(&player_id).map(|t| (t, ())))
        .await?;
    let tournament = get_tournament_from_store(&ctx.tourneys).await;
    broadcast_tourney_updated(&ctx.hub, &ctx.connections, &tournament, now()).await;
    Ok(())
}

/// Seats that started a game may immediately owe bot moves, if the seat
/// holding opening power is a bot — `set_ready`/quick-start only deal the
/// hand, so whoever starts a game also has to run its opening bot burst
/// before the state is broadcast.
fn run_opening_bot_turns(
    mut t: Tournament,
    started: bool,
    now_ts: i64,
) -> Result<(Tournament, Option<PlayOutcome>), ErrorCode> {
    if !started {
        return Ok((t, None));
    }
    let game = t
        .current_game
        .take()
        .expect("start_game always deals a game when it transitions to IN_PROGRESS");
    let (t, outcome) = conclude_move(t, game, now_ts)?;
    Ok((t, Some(outcome)))
}

pub async fn handle_ready(ctx: &Context, connection_id: &str) -> Result<(), ErrorCode> {
    let player_id = resolve_player_id(ctx, connection_id).await?;
    let now_ts = now();
    let (started, opening_outcome) = transform_tournament_in_store(&ctx.tourneys, move |t| {
        let (t, started) = t.set_ready(&player_id, true)?;
        let (t, opening_outcome) = run_opening_bot_turns(t, started, now_ts)?;
        Ok((t, (started, opening_outcome)))
    })
    .await?;
    let tournament = get_tournament_from_store(&ctx.tourneys).await;
    broadcast_tourney_updated(&ctx.hub, &ctx.connections, &tournament, now_ts).await;
    if started {
        broadcast_game_started(&ctx.hub, &tournament).await;
    }
    if let Some(outcome) = opening_outcome {
        broadcast_play_outcome(ctx, outcome).await;
    }
    Ok(())
}

pub async fn handle_add_bot(
    ctx: &Context,
    connection_id: &str,
    payload: AddBotPayload,
) -> Result<(), ErrorCode> {
    resolve_player_id(ctx, connection_id).await?;
    let seat_position = payload.seat_position.ok_or(ErrorCode::MissingSeatPosition)?;
    transform_tournament_in_store(&ctx.tourneys, |t| {
        t.add_bot(seat_position, payload.bot_profile.clone()).map(|t| (t, ()))
    })
    .await?;
    let tournament = get_tournament_from_store(&ctx.tourneys).await;
    broadcast_tourney_updated(&ctx.hub, &ctx.connections, &tournament, now()).await;
    Ok(())
}

pub async fn handle_kick_bot(
    ctx: &Context,
    connection_id: &str,
    payload: KickBotPayload,
) -> Result<(), ErrorCode> {
    resolve_player_id(ctx, connection_id).await?;
    let seat_position = payload.seat_position.ok_or(ErrorCode::MissingSeatPosition)?;
    transform_tournament_in_store(&ctx.tourneys, |t| t.kick_bot(seat_position).map(|t| (t, ()))).await?;
    let tournament = get_tournament_from_store(&ctx.tourneys).await;
    broadcast_tourney_updated(&ctx.hub, &ctx.connections, &tournament, now()).await;
    Ok(())
}

pub async fn handle_play(
    ctx: &Context,
    connection_id: &str,
    payload: PlayCardsPayload,
) -> Result<(), ErrorCode> {
    let player_id = resolve_player_id(ctx, connection_id).await?;
    let now_ts = now();
    let outcome = transform_tournament_in_store(&ctx.tourneys, move |mut t| {
        let mut game = t.current_game.take().ok_or(ErrorCode::NoActiveGame)?;
        let pos = game
            .player_ids
            .iter()
            .position(|id| id == &player_id)
            .ok_or(ErrorCode::NotInTourney)?;
        let play = game.validate_play(pos, payload.cards.clone())?;
        game.play_cards(pos, play);
        conclude_move(t, game, now_ts)
    })
    .await?;

    broadcast_play_outcome(ctx, outcome).await;
    Ok(())
}

pub async fn handle_pass(ctx: &Context, connection_id: &str) -> Result<(), ErrorCode> {
    let player_id = resolve_player_id(ctx, connection_id).await?;
    let now_ts = now();
    let outcome = transform_tournament_in_store(&ctx.tourneys, move |mut t| {
        let mut game = t.current_game.take().ok_or(ErrorCode::NoActiveGame)?;
        let pos = game
            .player_ids
            .iter()
            .position(|id| id == &player_id)
            .ok_or(ErrorCode::NotInTourney)?;
        game.pass_turn(pos)?;
        conclude_move(t, game, now_ts)
    })
    .await?;

    broadcast_play_outcome(ctx, outcome).await;
    Ok(())
}

pub async fn handle_debug_reset(ctx: &Context) -> Result<(), ErrorCode> {
    transform_tournament_in_store(&ctx.tourneys, |t| Ok((Tournament::new(t.target_score), ()))).await?;
    let tournament = get_tournament_from_store(&ctx.tourneys).await;
    broadcast_tourney_updated(&ctx.hub, &ctx.connections, &tournament, now()).await;
    Ok(())
}

pub async fn handle_debug_quick_start(
    ctx: &Context,
    connection_id: &str,
    seat_position: Option<usize>,
) -> Result<(), ErrorCode> {
    let player_id = resolve_player_id(ctx, connection_id).await?;
    let player_name = resolve_player_name(ctx, connection_id).await?;
    let now_ts = now();
    let (started, opening_outcome) = transform_tournament_in_store(&ctx.tourneys, move |t| {
        let fresh = Tournament::new(t.target_score);
        let (mut t, _human_pos) = fresh.claim_seat(&player_id, &player_name, connection_id, seat_position)?;
        for pos in 0..4 {
            if !t.seats[pos].is_occupied() {
                t = t.add_bot(pos, None)?;
            }
        }
        let (t, started) = t.set_ready(&player_id, true)?;
        let (t, opening_outcome) = run_opening_bot_turns(t, started, now_ts)?;
        Ok((t, (started, opening_outcome)))
    })
    .await?;
    let tournament = get_tournament_from_store(&ctx.tourneys).await;
    broadcast_tourney_updated(&ctx.hub, &ctx.connections, &tournament, now_ts).await;
    if started {
        broadcast_game_started(&ctx.hub, &tournament).await;
    }
    if let Some(outcome) = opening_outcome {
        broadcast_play_outcome(ctx, outcome).await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connections::{put_connection, Connection};
    use crate::protocol::{ClaimSeatPayload, PingPayload};

    async fn seat_player(ctx: &Context, connection_id: &str, player_id: &str) {
        put_connection(
            &ctx.connections,
            Connection::new(connection_id.into(), player_id.into(), player_id.into(), now()),
        )
        .await;
        handle_claim_seat(ctx, connection_id, ClaimSeatPayload { seat_position: None })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn ping_replies_pong_with_the_same_timestamp() {
        let ctx = Context::new(21);
        put_connection(&ctx.connections, Connection::new("c0".into(), "p0".into(), "P0".into(), now())).await;
        handle_ping(&ctx, "c0", PingPayload { timestamp: 42 }).await.unwrap();
    }

    #[tokio::test]
    async fn unauthorized_connection_cannot_claim_a_seat() {
        let ctx = Context::new(21);
        let err = handle_claim_seat(&ctx, "ghost", ClaimSeatPayload { seat_position: Some(0) })
            .await
            .unwrap_err();
        assert_eq!(err, ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn quick_start_deals_a_game_with_three_bots() {
        let ctx = Context::new(21);
        put_connection(&ctx.connections, Connection::new("c0".into(), "p0".into(), "P0".into(), now())).await;
        handle_debug_quick_start(&ctx, "c0", Some(0)).await.unwrap();
        let tournament = get_tournament_from_store(&ctx.tourneys).await;
        assert_eq!(tournament.status, crate::tourney::Status::InProgress);
        assert!(tournament.current_game.is_some());
        assert_eq!(tournament.seats.iter().filter(|s| s.is_bot).count(), 3);
    }

    #[tokio::test]
    async fn passing_with_power_is_rejected() {
        let ctx = Context::new(21);
        put_connection(&ctx.connections, Connection::new("c0".into(), "p0".into(), "P0".into(), now())).await;
        handle_debug_quick_start(&ctx, "c0", Some(0)).await.unwrap();

        let tournament = get_tournament_from_store(&ctx.tourneys).await;
        let game = tournament.current_game.unwrap();
        if game.current_player == 0 && game.last_play.is_none() {
            let err = handle_pass(&ctx, "c0").await.unwrap_err();
            assert_eq!(err, ErrorCode::CantPass);
        }
    }

    #[tokio::test]
    async fn two_claims_by_the_same_player_only_refresh_the_connection() {
        let ctx = Context::new(21);
        seat_player(&ctx, "c0", "p0").await;
        let before = get_tournament_from_store(&ctx.tourneys).await;
        seat_player(&ctx, "c0-reconnect", "p0").await;
        let after = get_tournament_from_store(&ctx.tourneys).await;
        assert_eq!(before.occupied_count(), after.occupied_count());
        assert_eq!(after.seats[0].connection_id.as_deref(), Some("c0-reconnect"));
    }
}
