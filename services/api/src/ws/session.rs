//! Manages one player's WebSocket connection, from upgrade to disconnect.

use super::protocol::ClientMessage;
use crate::state::AppState;
use anyhow::Result;
use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt, stream::SplitSink};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};
use turing_core::{ClientInput, GameMode, PlayerId, ServerEvent};

#[derive(Deserialize, Debug, Default)]
pub struct ConnectParams {
    /// Defaults to a standard game.
    pub mode: Option<GameMode>,
}

/// Axum handler to upgrade an HTTP connection to a WebSocket.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let mode = params.mode.unwrap_or(GameMode::Standard);
    ws.on_upgrade(move |socket| handle_socket(socket, state, mode))
}

/// Runs a single connection: seat the player, then shuttle messages both ways
/// until either side goes away.
#[instrument(name = "ws_connection", skip_all, fields(player_id, ?mode))]
async fn handle_socket(socket: WebSocket, state: Arc<AppState>, mode: GameMode) {
    let player = PlayerId::new();
    tracing::Span::current().record("player_id", player.as_str());
    info!("New WebSocket connection.");

    let (mut socket_tx, mut socket_rx) = socket.split();
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    state.connections.register(player.clone(), events_tx);

    match mode {
        GameMode::Solo => {
            if let Err(e) = state.start_game(GameMode::Solo, vec![player.clone()]).await {
                error!(error = %e, "Failed to start solo game");
                let _ = send_msg(
                    &mut socket_tx,
                    &ServerEvent::ActionError {
                        message: e.to_string(),
                    },
                )
                .await;
                state.disconnect(&player).await;
                return;
            }
        }
        GameMode::Standard => state.join_lobby(player.clone()).await,
    }

    loop {
        tokio::select! {
            Some(event) = events_rx.recv() => {
                if let Err(e) = send_msg(&mut socket_tx, &event).await {
                    warn!(error = %e, "Failed to write to socket.");
                    break;
                }
            }
            incoming = socket_rx.next() => match incoming {
                Some(Ok(Message::Text(text))) => match parse_client_message(&text) {
                    Ok(input) => state.route_input(&player, input),
                    Err(e) => warn!(error = %e, "Ignoring malformed client message."),
                },
                Some(Ok(Message::Close(_))) | None => {
                    info!("Client closed the connection.");
                    break;
                }
                Some(Ok(_)) => debug!("Ignoring non-text frame."),
                Some(Err(e)) => {
                    warn!(error = %e, "WebSocket error.");
                    break;
                }
            }
        }
    }

    state.disconnect(&player).await;
    info!("Connection finished.");
}

fn parse_client_message(text: &str) -> Result<ClientInput> {
    let message: ClientMessage = serde_json::from_str(text)?;
    Ok(message.into())
}

/// Serializes and sends one event to the client.
pub(crate) async fn send_msg(
    socket_tx: &mut SplitSink<WebSocket, Message>,
    event: &ServerEvent,
) -> Result<()> {
    let serialized = serde_json::to_string(event)?;
    socket_tx.send(Message::Text(serialized.into())).await?;
    Ok(())
}
