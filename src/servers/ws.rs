use std::net::SocketAddr;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State as AxumState};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

use crate::broadcast::{deregister_connection, register_connection};
use crate::connections::{delete_connection, put_connection, Connection};
use crate::dispatcher::{dispatch, Context};
use crate::tourney::transform_tournament_in_store;

/// Configuration for the WebSocket transport server.
#[derive(Debug, Clone)]
pub struct WsConfig {
    pub host: String,
    pub port: u16,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7878,
        }
    }
}

/// The WebSocket transport server: a single `/ws` upgrade endpoint backed
/// by the shared [`Context`].
pub struct WsServer {
    config: WsConfig,
    ctx: Context,
}

impl WsServer {
    pub fn new(config: WsConfig, ctx: Context) -> Self {
        Self { config, ctx }
    }

    pub async fn start(&self) -> crate::Result<()> {
        let app = self.create_router();
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|e| crate::ThirteenError::Internal(format!("bad listen address: {e}")))?;
        let listener = TcpListener::bind(addr).await?;

        log::info!("thirteen tournament server listening on ws://{addr}/ws");

        axum::serve(listener, app)
            .await
            .map_err(|e| crate::ThirteenError::Internal(format!("server loop exited: {e}")))
    }

    fn create_router(&self) -> Router {
        Router::new()
            .route("/ws", get(ws_upgrade))
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .with_state(self.ctx.clone())
    }
}

/// Query-string contract for the upgrade, mirroring the original's
/// `$connect` request: a required `playerId` and an optional display name.
#[derive(Debug, Deserialize)]
struct ConnectParams {
    #[serde(rename = "playerId")]
    player_id: String,
    #[serde(rename = "playerName")]
    player_name: Option<String>,
}

async fn ws_upgrade(
    AxumState(ctx): AxumState<Context>,
    Query(params): Query<ConnectParams>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, ctx, params))
}

/// Runs one connection's lifecycle end to end: `$connect` bookkeeping, the
/// inbound-frame loop, and `$disconnect` cleanup. Each inbound frame is
/// dispatched on its own spawned task (per the concurrency model), so a
/// slow handler for one frame cannot stall the read loop or the outbound
/// pump below it.
async fn handle_socket(socket: WebSocket, ctx: Context, params: ConnectParams) {
    let connection_id = Uuid::new_v4().to_string();
    let player_name = params.player_name.unwrap_or_else(|| "Player".to_string());
    let now = crate::dispatcher::now();

    put_connection(
        &ctx.connections,
        Connection::new(
            connection_id.clone(),
            params.player_id.clone(),
            player_name,
            now,
        ),
    )
    .await;

    let (outbound_tx, mut outbound_rx) = tokio::sync::mpsc::unbounded_channel::<String>();
    register_connection(&ctx.hub, connection_id.clone(), outbound_tx).await;

    log::info!("$connect {connection_id} player={}", params.player_id);

    let (mut sender, mut receiver) = socket.split();

    let pump_connection_id = connection_id.clone();
    let mut pump = tokio::spawn(async move {
        while let Some(frame) = outbound_rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                log::debug!("outbound pump for {pump_connection_id} stopped: socket closed");
                break;
            }
        }
    });

    loop {
        tokio::select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let ctx = ctx.clone();
                        let connection_id = connection_id.clone();
                        tokio::spawn(async move {
                            dispatch(&ctx, &connection_id, &text).await;
                        });
                    }
                    Some(Ok(Message::Close(_))) => {
                        log::info!("$disconnect {connection_id}: client closed");
                        break;
                    }
                    Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Binary(_))) => {}
                    Some(Err(e)) => {
                        log::warn!("$disconnect {connection_id}: read error: {e}");
                        break;
                    }
                    None => {
                        log::info!("$disconnect {connection_id}: stream ended");
                        break;
                    }
                }
            }
            _ = &mut pump => {
                log::debug!("$disconnect {connection_id}: outbound pump exited first");
                break;
            }
        }
    }

    pump.abort();
    deregister_connection(&ctx.hub, &connection_id).await;
    delete_connection(&ctx.connections, &connection_id).await;

    let now = crate::dispatcher::now();
    let _ = transform_tournament_in_store(&ctx.tourneys, move |mut t| {
        t.mark_disconnected(&connection_id, now);
        Ok((t, ()))
    })
    .await;
}
