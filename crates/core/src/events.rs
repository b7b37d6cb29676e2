//! Events exchanged between a session and its connected clients.
//!
//! The engine only ever produces [`Outbound`] values; the transport decides how
//! a [`Recipient`] maps to actual connections.

use crate::player::{PlayerId, PublicPlayer, RevealedPlayer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

pub type SessionId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Asking,
    Answering,
    Voting,
    Reveal,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Asking => "ASKING",
            Phase::Answering => "ANSWERING",
            Phase::Voting => "VOTING",
            Phase::Reveal => "REVEAL",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Standard,
    Solo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Humans,
    Ai,
    Nobody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoloOutcome {
    Survived,
    Eliminated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEntry {
    pub name: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EliminatedPlayer {
    pub id: PlayerId,
    pub name: String,
    pub was_human: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealResults {
    pub vote_counts: BTreeMap<PlayerId, u32>,
    pub eliminated: Vec<EliminatedPlayer>,
    pub votes: BTreeMap<PlayerId, Option<PlayerId>>,
}

/// Payload of `new_round_phase`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseAnnouncement {
    pub round: u32,
    pub phase: Phase,
    /// Seconds until the phase deadline.
    pub duration: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asker_id: Option<PlayerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asker_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answers: Option<BTreeMap<PlayerId, AnswerEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<RevealResults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub players: Option<Vec<PublicPlayer>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalState {
    pub rounds_played: u32,
    pub players: Vec<RevealedPlayer>,
}

/// Messages pushed from the server to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    GameStart {
        game_id: SessionId,
        mode: GameMode,
        players: Vec<PublicPlayer>,
        your_player_id: PlayerId,
    },
    NewRoundPhase(PhaseAnnouncement),
    VoteAccepted,
    ActionError {
        message: String,
    },
    GameOver {
        reason: String,
        winner: Winner,
        #[serde(skip_serializing_if = "Option::is_none")]
        solo_outcome: Option<SoloOutcome>,
        final_state: FinalState,
    },
    PlayerUpdate {
        players: Vec<PublicPlayer>,
    },
    ForceRefreshUi {
        correct_phase: Phase,
        correct_round: u32,
        reason: String,
    },
    CheckUiState {
        current_phase: Phase,
        round: u32,
        timestamp: i64,
    },
    WaitingPlayerCount {
        count: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    /// Every human seated in the session.
    All,
    Player(PlayerId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub to: Recipient,
    pub event: ServerEvent,
}

impl Outbound {
    pub fn all(event: ServerEvent) -> Self {
        Self {
            to: Recipient::All,
            event,
        }
    }

    pub fn to(player: &PlayerId, event: ServerEvent) -> Self {
        Self {
            to: Recipient::Player(player.clone()),
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_phase_wire_names() {
        assert_eq!(serde_json::to_string(&Phase::Asking).unwrap(), "\"ASKING\"");
        assert_eq!(Phase::Voting.to_string(), "VOTING");
        let parsed: Phase = serde_json::from_str("\"REVEAL\"").unwrap();
        assert_eq!(parsed, Phase::Reveal);
    }

    #[test]
    fn test_new_round_phase_omits_empty_fields() {
        let event = ServerEvent::NewRoundPhase(PhaseAnnouncement {
            round: 2,
            phase: Phase::Asking,
            duration: 30,
            asker_id: Some(PlayerId::from("p1")),
            asker_name: Some("LazyFox12".to_string()),
            question: None,
            answers: None,
            results: None,
            players: None,
        });

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "new_round_phase",
                "round": 2,
                "phase": "ASKING",
                "duration": 30,
                "askerId": "p1",
                "askerName": "LazyFox12",
            })
        );
    }

    #[test]
    fn test_force_refresh_field_names() {
        let event = ServerEvent::ForceRefreshUi {
            correct_phase: Phase::Voting,
            correct_round: 3,
            reason: "ack_timeout".to_string(),
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "force_refresh_ui");
        assert_eq!(value["correctPhase"], "VOTING");
        assert_eq!(value["correctRound"], 3);
    }

    #[test]
    fn test_game_over_solo_outcome() {
        let event = ServerEvent::GameOver {
            reason: "You survived!".to_string(),
            winner: Winner::Humans,
            solo_outcome: Some(SoloOutcome::Survived),
            final_state: FinalState {
                rounds_played: 3,
                players: vec![],
            },
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["soloOutcome"], "survived");
        assert_eq!(value["winner"], "humans");
        assert_eq!(value["finalState"]["roundsPlayed"], 3);
    }

    #[test]
    fn test_unit_variant_tag() {
        let value = serde_json::to_value(ServerEvent::VoteAccepted).unwrap();
        assert_eq!(value, json!({ "type": "vote_accepted" }));
    }
}
