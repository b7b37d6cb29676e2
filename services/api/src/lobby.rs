//! Waiting room for standard games.

use std::collections::VecDeque;
use tokio::sync::Mutex;
use turing_core::PlayerId;

/// First come, first seated. A group forms as soon as enough players wait.
pub struct Lobby {
    group_size: usize,
    waiting: Mutex<VecDeque<PlayerId>>,
}

impl Lobby {
    pub fn new(group_size: usize) -> Self {
        Self {
            group_size: group_size.max(1),
            waiting: Mutex::new(VecDeque::new()),
        }
    }

    pub fn group_size(&self) -> usize {
        self.group_size
    }

    /// Queues `player`. Returns a full group, oldest first, once one is ready.
    pub async fn join(&self, player: PlayerId) -> Option<Vec<PlayerId>> {
        let mut waiting = self.waiting.lock().await;
        if !waiting.contains(&player) {
            waiting.push_back(player);
        }
        if waiting.len() >= self.group_size {
            Some(waiting.drain(..self.group_size).collect())
        } else {
            None
        }
    }

    pub async fn leave(&self, player: &PlayerId) -> bool {
        let mut waiting = self.waiting.lock().await;
        let before = waiting.len();
        waiting.retain(|p| p != player);
        waiting.len() != before
    }

    pub async fn waiting(&self) -> Vec<PlayerId> {
        self.waiting.lock().await.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.waiting.lock().await.len()
    }
}
