//! Shared Application State
//!
//! `AppState` wires the session manager, the lobby and the connection
//! registry together and carries the matchmaking glue between them.

use crate::config::Config;
use crate::connections::ConnectionRegistry;
use crate::lobby::Lobby;
use std::sync::Arc;
use tokio::sync::mpsc::unbounded_channel;
use tracing::{error, info, warn};
use turing_core::agent::AiAgent;
use turing_core::gateway::AiActionGateway;
use turing_core::moderation::{Blocklist, ContentFilter, PassThrough};
use turing_core::{
    ClientInput, GameMode, PlayerId, ServerEvent, SessionError, SessionHandle, SessionManager,
    SessionServices,
};

/// The shared application state, created once at startup and passed to all handlers.
pub struct AppState {
    pub sessions: SessionManager,
    pub lobby: Lobby,
    pub connections: Arc<ConnectionRegistry>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, agent: Arc<dyn AiAgent>) -> Arc<Self> {
        let filter: Arc<dyn ContentFilter> = if config.blocked_words.is_empty() {
            Arc::new(PassThrough)
        } else {
            Arc::new(Blocklist::new(&config.blocked_words))
        };
        let gateway = Arc::new(AiActionGateway::new(agent, config.gateway));
        let services = SessionServices::new(config.rules.clone(), gateway).with_filter(filter);

        let connections = Arc::new(ConnectionRegistry::new());
        let sessions = SessionManager::new(services, connections.clone());

        Arc::new(Self {
            sessions,
            lobby: Lobby::new(config.rules.standard_humans),
            connections,
            config: Arc::new(config),
        })
    }

    /// Starts a session for `humans` and routes its events to their sockets.
    pub async fn start_game(
        &self,
        mode: GameMode,
        humans: Vec<PlayerId>,
    ) -> Result<SessionHandle, SessionError> {
        let (outbound, events) = unbounded_channel();
        let handle = self.sessions.create(mode, humans.clone(), outbound).await?;
        // A socket may have closed while the group was forming.
        for player in humans.iter().filter(|p| !self.connections.is_connected(p)) {
            let _ = handle.disconnect(player.clone());
        }
        Arc::clone(&self.connections).pump(humans, events);
        Ok(handle)
    }

    /// Queues a player for a standard game and starts one when a group forms.
    pub async fn join_lobby(&self, player: PlayerId) {
        if let Some(group) = self.lobby.join(player).await {
            info!(players = group.len(), "Lobby group ready");
            if let Err(e) = self.start_game(GameMode::Standard, group).await {
                error!(error = %e, "Failed to start standard game");
            }
        }
        self.announce_lobby().await;
    }

    /// Tells everyone still waiting how many are waiting.
    pub async fn announce_lobby(&self) {
        let waiting = self.lobby.waiting().await;
        let count = waiting.len();
        for player in &waiting {
            self.connections
                .send(player, ServerEvent::WaitingPlayerCount { count });
        }
    }

    /// Hands client input to the player's session, if it has one.
    pub fn route_input(&self, player: &PlayerId, input: ClientInput) {
        let Some(handle) = self.connections.session_of(player) else {
            warn!(%player, "Input from a player with no game; ignoring");
            return;
        };
        if let Err(e) = handle.submit(player.clone(), input) {
            warn!(%player, error = %e, "Session no longer accepts input");
        }
    }

    /// Cleans up after a socket closes.
    pub async fn disconnect(&self, player: &PlayerId) {
        if let Some(handle) = self.connections.unregister(player) {
            let _ = handle.disconnect(player.clone());
        } else if self.lobby.leave(player).await {
            self.announce_lobby().await;
        }
    }
}
