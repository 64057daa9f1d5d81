use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::RwLock;

use crate::connections::{scan_connections, ConnectionRegistry};
use crate::protocol::{GameOverPayload, GameStartedPayload, GameUpdatedPayload, PlayerSummary, ServerFrame};
use crate::tourney::Tournament;

/// One entry per live connection: the sending half of its outbound queue.
/// The receiving half is owned by the transport task pumping frames onto
/// the socket; a closed channel means the connection is gone.
#[derive(Default)]
struct HubState {
    senders: HashMap<String, UnboundedSender<String>>,
}

#[derive(Clone, Default)]
pub struct BroadcastHub {
    inner: Arc<RwLock<HubState>>,
}

pub fn new_broadcast_hub() -> BroadcastHub {
    BroadcastHub::default()
}

pub async fn register_connection(hub: &BroadcastHub, connection_id: String, sender: UnboundedSender<String>) {
    hub.inner.write().await.senders.insert(connection_id, sender);
}

pub async fn deregister_connection(hub: &BroadcastHub, connection_id: &str) {
    hub.inner.write().await.senders.remove(connection_id);
}

/// Sends one frame to one connection. A closed channel (connection gone) is
/// dropped silently; that is the expected steady-state outcome of a client
/// disconnecting mid-broadcast, not a fault.
pub async fn send_to(hub: &BroadcastHub, connection_id: &str, frame: &ServerFrame) {
    let sender = {
        let state = hub.inner.read().await;
        state.senders.get(connection_id).cloned()
    };
    if let Some(sender) = sender {
        if sender.send(frame.to_json()).is_err() {
            log::debug!("dropping send to gone connection {connection_id}");
        }
    }
}

/// `tourney/updated` goes to everyone seated plus every other live
/// connection (spectators included), matching how lobby state is public.
pub async fn broadcast_tourney_updated(
    hub: &BroadcastHub,
    registry: &ConnectionRegistry,
    tournament: &Tournament,
    now: i64,
) {
    let frame = ServerFrame::TourneyUpdated(tournament.to_client_state());
    let mut recipients: HashSet<String> = tournament
        .seats
        .iter()
        .filter_map(|s| s.connection_id.clone())
        .collect();
    for conn in scan_connections(registry, now).await {
        recipients.insert(conn.connection_id);
    }
    for connection_id in recipients {
        send_to(hub, &connection_id, &frame).await;
    }
}

pub async fn broadcast_game_started(hub: &BroadcastHub, tournament: &Tournament) {
    let Some(game) = &tournament.current_game else {
        return;
    };
    let players: Vec<PlayerSummary> = tournament
        .seats
        .iter()
        .map(|s| PlayerSummary {
            position: s.position,
            player_name: s.player_name.clone(),
            is_bot: s.is_bot,
        })
        .collect();
    for seat in tournament.seats.iter().filter(|s| s.is_occupied()) {
        let Some(connection_id) = &seat.connection_id else {
            continue;
        };
        let frame = ServerFrame::GameStarted(GameStartedPayload {
            your_position: seat.position,
            your_hand: game.hands[seat.position].clone(),
            current_player: game.current_player,
            players: players.clone(),
        });
        send_to(hub, connection_id, &frame).await;
    }
}

pub async fn broadcast_game_updated(hub: &BroadcastHub, tournament: &Tournament) {
    let Some(game) = &tournament.current_game else {
        return;
    };
    let hand_counts: [usize; 4] = std::array::from_fn(|i| game.hands[i].len());
    for seat in tournament.seats.iter().filter(|s| s.is_occupied()) {
        let Some(connection_id) = &seat.connection_id else {
            continue;
        };
        let frame = ServerFrame::GameUpdated(GameUpdatedPayload {
            current_player: game.current_player,
            last_play: game.last_play.clone(),
            passed_players: game.passed_players,
            hand_counts,
            your_hand: game.hands[seat.position].clone(),
        });
        send_to(hub, connection_id, &frame).await;
    }
}

pub async fn broadcast_game_over(
    hub: &BroadcastHub,
    tournament: &Tournament,
    win_order: Vec<usize>,
    points_awarded: Vec<u32>,
    tourney_complete: bool,
) {
    let frame = ServerFrame::GameOver(GameOverPayload {
        win_order,
        points_awarded,
        leaderboard: tournament.get_leaderboard(),
        tourney_complete,
        winner: if tourney_complete {
            tournament.winner_position()
        } else {
            None
        },
    });
    for seat in tournament.seats.iter().filter(|s| s.is_occupied()) {
        if let Some(connection_id) = &seat.connection_id {
            send_to(hub, connection_id, &frame).await;
        }
    }
}
