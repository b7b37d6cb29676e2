//! Client Resync
//!
//! [`SyncSupervisor`] nudges clients that look out of date. It watches phase
//! acknowledgements and heartbeats and pushes `force_refresh_ui` when a client
//! is late or wrong. It only ever sends events; the engine's state is never
//! touched from here.

use crate::engine::{Epoch, SessionCommand};
use crate::events::{Outbound, Phase, ServerEvent};
use crate::player::PlayerId;
use crate::rules::SyncSettings;
use std::collections::HashMap;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at, sleep};
use tracing::debug;

pub const ACK_TIMEOUT: &str = "ack_timeout";
pub const STATE_MISMATCH: &str = "state_mismatch";

pub struct SyncSupervisor {
    settings: SyncSettings,
    outbound: UnboundedSender<Outbound>,
    commands: UnboundedSender<SessionCommand>,
    current: Option<Epoch>,
    watchdogs: HashMap<PlayerId, JoinHandle<()>>,
    sweep: Option<JoinHandle<()>>,
}

impl SyncSupervisor {
    pub fn new(
        settings: SyncSettings,
        outbound: UnboundedSender<Outbound>,
        commands: UnboundedSender<SessionCommand>,
    ) -> Self {
        Self {
            settings,
            outbound,
            commands,
            current: None,
            watchdogs: HashMap::new(),
            sweep: None,
        }
    }

    /// Starts the periodic `check_ui_state` sweep.
    pub fn start_sweep(&mut self) {
        if self.sweep.is_some() {
            return;
        }
        let period = self.settings.sweep_interval;
        let commands = self.commands.clone();
        self.sweep = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                if commands.send(SessionCommand::SyncSweep).is_err() {
                    break;
                }
            }
        }));
    }

    /// Forgets previous acknowledgements and arms one watchdog per human.
    pub fn phase_changed<I>(&mut self, epoch: Epoch, humans: I)
    where
        I: IntoIterator<Item = PlayerId>,
    {
        self.clear_watchdogs();
        self.current = Some(epoch);

        for player in humans {
            let commands = self.commands.clone();
            let grace = self.settings.ack_grace;
            let id = player.clone();
            let handle = tokio::spawn(async move {
                sleep(grace).await;
                let _ = commands.send(SessionCommand::AckOverdue { epoch, player: id });
            });
            self.watchdogs.insert(player, handle);
        }
    }

    /// A client confirmed it rendered a phase.
    pub fn acknowledge(&mut self, player: &PlayerId, round: Option<u32>, phase: Option<Phase>) {
        if let Some(handle) = self.watchdogs.remove(player) {
            handle.abort();
        }
        self.compare(player, round, phase);
    }

    /// A client reported what it is showing.
    pub fn heartbeat(&self, player: &PlayerId, round: Option<u32>, phase: Option<Phase>) {
        self.compare(player, round, phase);
    }

    /// Watchdog fired. Ignored if the phase has moved on or the ack arrived.
    pub fn ack_overdue(&mut self, epoch: Epoch, player: &PlayerId) {
        if self.current != Some(epoch) || self.watchdogs.remove(player).is_none() {
            return;
        }
        debug!(%player, round = epoch.round, phase = %epoch.phase, "Phase ack overdue");
        self.refresh(player, epoch, ACK_TIMEOUT);
    }

    /// Broadcasts the authoritative phase so clients can report mismatches.
    pub fn sweep(&self) {
        let Some(epoch) = self.current else { return };
        let _ = self.outbound.send(Outbound::all(ServerEvent::CheckUiState {
            current_phase: epoch.phase,
            round: epoch.round,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }));
    }

    pub fn player_left(&mut self, player: &PlayerId) {
        if let Some(handle) = self.watchdogs.remove(player) {
            handle.abort();
        }
    }

    pub fn stop(&mut self) {
        self.clear_watchdogs();
        if let Some(sweep) = self.sweep.take() {
            sweep.abort();
        }
        self.current = None;
    }

    pub fn pending_acks(&self) -> usize {
        self.watchdogs.len()
    }

    fn compare(&self, player: &PlayerId, round: Option<u32>, phase: Option<Phase>) {
        let Some(epoch) = self.current else { return };
        let stale_round = round.is_some_and(|r| r != epoch.round);
        let stale_phase = phase.is_some_and(|p| p != epoch.phase);
        if stale_round || stale_phase {
            debug!(%player, ?round, ?phase, "Client out of sync");
            self.refresh(player, epoch, STATE_MISMATCH);
        }
    }

    fn refresh(&self, player: &PlayerId, epoch: Epoch, reason: &str) {
        let _ = self.outbound.send(Outbound::to(
            player,
            ServerEvent::ForceRefreshUi {
                correct_phase: epoch.phase,
                correct_round: epoch.round,
                reason: reason.to_string(),
            },
        ));
    }

    fn clear_watchdogs(&mut self) {
        for (_, handle) in self.watchdogs.drain() {
            handle.abort();
        }
    }
}

impl Drop for SyncSupervisor {
    fn drop(&mut self) {
        self.stop();
    }
}
