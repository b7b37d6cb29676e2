//! Live websocket connections and the session each player is seated in.

use dashmap::DashMap;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use turing_core::engine::SessionSummary;
use turing_core::{Outbound, PlayerId, Recipient, ServerEvent, SessionHandle, SessionHooks};

#[derive(Default)]
pub struct ConnectionRegistry {
    senders: DashMap<PlayerId, UnboundedSender<ServerEvent>>,
    seats: DashMap<PlayerId, SessionHandle>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, player: PlayerId, sender: UnboundedSender<ServerEvent>) {
        self.senders.insert(player, sender);
    }

    /// Drops the connection. Returns the session the player was seated in.
    pub fn unregister(&self, player: &PlayerId) -> Option<SessionHandle> {
        self.senders.remove(player);
        self.seats.remove(player).map(|(_, handle)| handle)
    }

    pub fn session_of(&self, player: &PlayerId) -> Option<SessionHandle> {
        self.seats.get(player).map(|seat| seat.value().clone())
    }

    pub fn is_connected(&self, player: &PlayerId) -> bool {
        self.senders.contains_key(player)
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }

    /// Returns false when the player is gone or its socket task has ended.
    pub fn send(&self, player: &PlayerId, event: ServerEvent) -> bool {
        match self.senders.get(player) {
            Some(sender) => sender.send(event).is_ok(),
            None => false,
        }
    }

    /// Routes one session event. `humans` is the session's seated roster.
    pub fn deliver(&self, humans: &[PlayerId], message: Outbound) {
        match message.to {
            Recipient::Player(player) => {
                if !self.send(&player, message.event) {
                    debug!(%player, "Dropping event for departed player");
                }
            }
            Recipient::All => {
                for player in humans {
                    self.send(player, message.event.clone());
                }
            }
        }
    }

    /// Forwards a session's events until the session drops its sender.
    pub fn pump(
        self: std::sync::Arc<Self>,
        humans: Vec<PlayerId>,
        mut events: UnboundedReceiver<Outbound>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(message) = events.recv().await {
                self.deliver(&humans, message);
            }
        })
    }
}

impl SessionHooks for ConnectionRegistry {
    fn on_create(&self, handle: &SessionHandle) {
        for player in handle.humans() {
            if self.is_connected(player) {
                self.seats.insert(player.clone(), handle.clone());
            }
        }
    }

    fn on_destroy(&self, summary: &SessionSummary) {
        for player in &summary.humans {
            self.seats
                .remove_if(player, |_, handle| handle.id() == summary.id);
        }
        info!(game_id = %summary.id, "Players released from session");
    }
}
