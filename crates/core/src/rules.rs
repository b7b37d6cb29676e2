//! Game constants shared by every session.

use crate::events::Phase;
use crate::votes::TiePolicy;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDurations {
    pub asking: Duration,
    pub answering: Duration,
    pub voting: Duration,
    pub reveal: Duration,
}

impl PhaseDurations {
    pub fn of(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Asking => self.asking,
            Phase::Answering => self.answering,
            Phase::Voting => self.voting,
            Phase::Reveal => self.reveal,
        }
    }
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            asking: Duration::from_secs(30),
            answering: Duration::from_secs(30),
            voting: Duration::from_secs(30),
            reveal: Duration::from_secs(15),
        }
    }
}

/// Client reconciliation timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSettings {
    /// How long a human may take to acknowledge a phase change.
    pub ack_grace: Duration,
    /// Period of the `check_ui_state` sweep.
    pub sweep_interval: Duration,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            ack_grace: Duration::from_secs(3),
            sweep_interval: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRules {
    pub durations: PhaseDurations,
    pub question_max_len: usize,
    pub answer_max_len: usize,
    pub standard_humans: usize,
    pub standard_ai: usize,
    pub solo_ai: usize,
    pub solo_target_rounds: u32,
    pub tie_policy: TiePolicy,
    /// Safety cap on standard-mode rounds; `None` keeps them unbounded.
    pub max_rounds: Option<u32>,
    pub sync: SyncSettings,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            durations: PhaseDurations::default(),
            question_max_len: 40,
            answer_max_len: 100,
            standard_humans: 3,
            standard_ai: 3,
            solo_ai: 5,
            solo_target_rounds: 3,
            tie_policy: TiePolicy::default(),
            max_rounds: None,
            sync: SyncSettings::default(),
        }
    }
}
