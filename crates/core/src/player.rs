//! Player Roster
//!
//! Players are owned by a single [`PlayerRegistry`] per session. Everything else
//! in the engine refers to them by [`PlayerId`], which is an opaque identity that
//! carries no information about the transport connection or about whether the
//! player is human.

use crate::cosmetics::Cosmetics;
use crate::prompts::PromptVariant;
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// Stable, opaque identity of a player within a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Mints a fresh random identity.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PlayerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    Active,
    Eliminated,
    Disconnected,
}

/// A seat in the game. Only the registry hands out mutable access.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
    pub avatar: String,
    pub is_human: bool,
    pub status: PlayerStatus,
    /// Tone selector for AI prompts. Ignored for humans.
    pub prompt_variant: PromptVariant,
}

impl Player {
    pub fn is_active(&self) -> bool {
        self.status == PlayerStatus::Active
    }

    /// Projection safe to broadcast: no human/AI tag.
    pub fn public(&self) -> PublicPlayer {
        PublicPlayer {
            id: self.id.clone(),
            name: self.display_name.clone(),
            avatar: self.avatar.clone(),
            status: self.status,
        }
    }

    /// Full view including the human/AI tag, used once the game is over.
    pub fn revealed(&self) -> RevealedPlayer {
        RevealedPlayer {
            id: self.id.clone(),
            name: self.display_name.clone(),
            avatar: self.avatar.clone(),
            status: self.status,
            is_human: self.is_human,
        }
    }

    /// The read-only identity handed to the AI agent.
    pub fn persona(&self) -> AgentPersona {
        AgentPersona {
            id: self.id.clone(),
            name: self.display_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicPlayer {
    pub id: PlayerId,
    pub name: String,
    pub avatar: String,
    pub status: PlayerStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealedPlayer {
    pub id: PlayerId,
    pub name: String,
    pub avatar: String,
    pub status: PlayerStatus,
    pub is_human: bool,
}

/// What an AI agent is told about the seat it is playing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentPersona {
    pub id: PlayerId,
    pub name: String,
}

/// Roster for one session.
#[derive(Debug, Clone, Default)]
pub struct PlayerRegistry {
    players: Vec<Player>,
}

impl PlayerRegistry {
    /// Seats the given humans, fills up with `ai_count` AI players and shuffles
    /// everyone so that seating order says nothing about who is human.
    pub fn build<R: Rng + ?Sized>(
        humans: &[PlayerId],
        ai_count: usize,
        cosmetics: &dyn Cosmetics,
        rng: &mut R,
    ) -> Self {
        let mut taken = HashSet::new();
        let mut players = Vec::with_capacity(humans.len() + ai_count);

        for id in humans {
            let display_name = cosmetics.display_name(&taken);
            taken.insert(display_name.clone());
            players.push(Player {
                id: id.clone(),
                display_name,
                avatar: cosmetics.avatar(),
                is_human: true,
                status: PlayerStatus::Active,
                prompt_variant: PromptVariant::Plain,
            });
        }

        for _ in 0..ai_count {
            let display_name = cosmetics.display_name(&taken);
            taken.insert(display_name.clone());
            players.push(Player {
                id: PlayerId::new(),
                display_name,
                avatar: cosmetics.avatar(),
                is_human: false,
                status: PlayerStatus::Active,
                prompt_variant: *PromptVariant::ALL
                    .choose(rng)
                    .unwrap_or(&PromptVariant::Plain),
            });
        }

        players.shuffle(rng);
        Self { players }
    }

    pub fn get(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| &p.id == id)
    }

    pub fn all(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn is_active(&self, id: &PlayerId) -> bool {
        self.get(id).is_some_and(Player::is_active)
    }

    pub fn active(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_active())
    }

    pub fn active_humans(&self) -> impl Iterator<Item = &Player> {
        self.active().filter(|p| p.is_human)
    }

    pub fn active_ai(&self) -> impl Iterator<Item = &Player> {
        self.active().filter(|p| !p.is_human)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    pub fn public_view(&self) -> Vec<PublicPlayer> {
        self.players.iter().map(Player::public).collect()
    }

    pub fn revealed_view(&self) -> Vec<RevealedPlayer> {
        self.players.iter().map(Player::revealed).collect()
    }

    /// Moves an active player to `status`. Returns false if the player was
    /// unknown or already inactive.
    pub(crate) fn deactivate(&mut self, id: &PlayerId, status: PlayerStatus) -> bool {
        match self.get_mut(id) {
            Some(player) if player.is_active() => {
                player.status = status;
                true
            }
            _ => false,
        }
    }
}
