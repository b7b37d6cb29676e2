//! Session boundary: who sits at the table and when the game is over.
//!
//! Standard and solo games share every phase rule. They differ only in the
//! roster shape and in the end condition, both of which live here.

use crate::cosmetics::Cosmetics;
use crate::error::SessionError;
use crate::events::{GameMode, SessionId, SoloOutcome, Winner};
use crate::player::{PlayerId, PlayerRegistry};
use crate::rules::GameRules;
use rand::Rng;

/// Why and how a session finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ending {
    pub reason: String,
    pub winner: Winner,
    pub solo_outcome: Option<SoloOutcome>,
}

impl Ending {
    fn new(reason: &str, winner: Winner, solo_outcome: Option<SoloOutcome>) -> Self {
        Self {
            reason: reason.to_string(),
            winner,
            solo_outcome,
        }
    }

    pub fn not_enough_players() -> Self {
        Self::new("Not enough players", Winner::Nobody, None)
    }

    pub fn closed() -> Self {
        Self::new("Game closed by server", Winner::Nobody, None)
    }
}

#[derive(Debug, Clone)]
pub struct GameLifecycle {
    id: SessionId,
    mode: GameMode,
    rules: GameRules,
}

impl GameLifecycle {
    pub fn new(id: SessionId, mode: GameMode, rules: GameRules) -> Self {
        Self { id, mode, rules }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn expected_humans(&self) -> usize {
        match self.mode {
            GameMode::Standard => self.rules.standard_humans,
            GameMode::Solo => 1,
        }
    }

    pub fn ai_count(&self) -> usize {
        match self.mode {
            GameMode::Standard => self.rules.standard_ai,
            GameMode::Solo => self.rules.solo_ai,
        }
    }

    /// Survival goal in solo mode; standard games are unbounded.
    pub fn target_rounds(&self) -> Option<u32> {
        match self.mode {
            GameMode::Standard => None,
            GameMode::Solo => Some(self.rules.solo_target_rounds),
        }
    }

    pub fn build_roster<R: Rng + ?Sized>(
        &self,
        humans: &[PlayerId],
        cosmetics: &dyn Cosmetics,
        rng: &mut R,
    ) -> Result<PlayerRegistry, SessionError> {
        let expected = self.expected_humans();
        if humans.len() != expected {
            return Err(SessionError::RosterMismatch {
                mode: self.mode,
                expected,
                got: humans.len(),
            });
        }
        Ok(PlayerRegistry::build(humans, self.ai_count(), cosmetics, rng))
    }

    /// Checks the end condition. `after_reveal` is true only once a round's
    /// reveal has finished displaying; round-count conditions apply only then.
    pub fn check_end(
        &self,
        players: &PlayerRegistry,
        round: u32,
        after_reveal: bool,
    ) -> Option<Ending> {
        match self.mode {
            GameMode::Standard => {
                if players.active_ai().next().is_none() {
                    return Some(Ending::new("Humans win!", Winner::Humans, None));
                }
                if players.active_humans().next().is_none() {
                    return Some(Ending::new("AI wins!", Winner::Ai, None));
                }
                match self.rules.max_rounds {
                    Some(limit) if after_reveal && round >= limit => {
                        Some(Ending::new("Round limit reached", Winner::Nobody, None))
                    }
                    _ => None,
                }
            }
            GameMode::Solo => {
                if players.active_humans().next().is_none() {
                    return Some(Ending::new(
                        "You were caught!",
                        Winner::Ai,
                        Some(SoloOutcome::Eliminated),
                    ));
                }
                let outlasted = players.active_ai().next().is_none();
                if outlasted || (after_reveal && round >= self.rules.solo_target_rounds) {
                    return Some(Ending::new(
                        "You survived!",
                        Winner::Humans,
                        Some(SoloOutcome::Survived),
                    ));
                }
                None
            }
        }
    }
}
