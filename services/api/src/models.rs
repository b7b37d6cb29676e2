//! REST Models
//!
//! Read-only views of running games, shaped for the REST surface and for
//! generating OpenAPI documentation with `utoipa`. None of them reveal which
//! seats are human.

use serde::Serialize;
use std::fmt;
use turing_core::player::{PlayerStatus, PublicPlayer};
use turing_core::{GameMode, Phase, SessionSnapshot};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Active,
    Eliminated,
    Disconnected,
}

impl From<PlayerStatus> for SeatStatus {
    fn from(status: PlayerStatus) -> Self {
        match status {
            PlayerStatus::Active => SeatStatus::Active,
            PlayerStatus::Eliminated => SeatStatus::Eliminated,
            PlayerStatus::Disconnected => SeatStatus::Disconnected,
        }
    }
}

impl fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeatStatus::Active => write!(f, "active"),
            SeatStatus::Eliminated => write!(f, "eliminated"),
            SeatStatus::Disconnected => write!(f, "disconnected"),
        }
    }
}

#[derive(Serialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    #[schema(value_type = String, format = Uuid)]
    pub id: Uuid,
    #[schema(value_type = String, example = "standard")]
    pub mode: GameMode,
    pub round: u32,
    #[schema(value_type = Option<String>, example = "VOTING")]
    pub phase: Option<Phase>,
    pub active_players: usize,
}

impl From<&SessionSnapshot> for GameSummary {
    fn from(snapshot: &SessionSnapshot) -> Self {
        Self {
            id: snapshot.id,
            mode: snapshot.mode,
            round: snapshot.round,
            phase: snapshot.phase,
            active_players: snapshot.active_players(),
        }
    }
}

#[derive(Serialize, ToSchema, Debug, Clone, PartialEq)]
pub struct Seat {
    #[schema(example = "3f0c2c1e-5b7a-4c8e-9a55-2f3c4d5e6f70")]
    pub id: String,
    #[schema(example = "SneakyOtter42")]
    pub name: String,
    #[schema(example = "🦦")]
    pub avatar: String,
    pub status: SeatStatus,
}

impl From<PublicPlayer> for Seat {
    fn from(player: PublicPlayer) -> Self {
        Self {
            id: player.id.to_string(),
            name: player.name,
            avatar: player.avatar,
            status: player.status.into(),
        }
    }
}

#[derive(Serialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameDetail {
    #[schema(value_type = String, format = Uuid)]
    pub id: Uuid,
    #[schema(value_type = String, example = "solo")]
    pub mode: GameMode,
    pub round: u32,
    #[schema(value_type = Option<String>, example = "ANSWERING")]
    pub phase: Option<Phase>,
    pub asker_id: Option<String>,
    pub question: Option<String>,
    pub answers_received: usize,
    pub votes_received: usize,
    pub players: Vec<Seat>,
}

impl From<SessionSnapshot> for GameDetail {
    fn from(snapshot: SessionSnapshot) -> Self {
        Self {
            id: snapshot.id,
            mode: snapshot.mode,
            round: snapshot.round,
            phase: snapshot.phase,
            asker_id: snapshot.asker_id.map(|id| id.to_string()),
            question: snapshot.question,
            answers_received: snapshot.answers_received,
            votes_received: snapshot.votes_received,
            players: snapshot.players.into_iter().map(Seat::from).collect(),
        }
    }
}

#[derive(Serialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LobbyStatus {
    pub waiting: usize,
    /// Players needed to start a standard game.
    pub group_size: usize,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use turing_core::PlayerId;

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            id: Uuid::nil(),
            mode: GameMode::Standard,
            round: 2,
            phase: Some(Phase::Voting),
            asker_id: Some(PlayerId::from("p1")),
            question: Some("Best pizza topping?".to_string()),
            answers_received: 4,
            votes_received: 1,
            players: vec![
                PublicPlayer {
                    id: PlayerId::from("p1"),
                    name: "LazyFox12".to_string(),
                    avatar: "🦊".to_string(),
                    status: PlayerStatus::Active,
                },
                PublicPlayer {
                    id: PlayerId::from("p2"),
                    name: "CalmOwl07".to_string(),
                    avatar: "🦉".to_string(),
                    status: PlayerStatus::Eliminated,
                },
            ],
        }
    }

    #[test]
    fn test_seat_status_display() {
        assert_eq!(SeatStatus::Active.to_string(), "active");
        assert_eq!(SeatStatus::Disconnected.to_string(), "disconnected");
        assert_eq!(SeatStatus::from(PlayerStatus::Eliminated), SeatStatus::Eliminated);
    }

    #[test]
    fn test_game_summary_serialization() {
        let summary = GameSummary::from(&snapshot());
        assert_eq!(summary.active_players, 1);

        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "00000000-0000-0000-0000-000000000000",
                "mode": "standard",
                "round": 2,
                "phase": "VOTING",
                "activePlayers": 1
            })
        );
    }

    #[test]
    fn test_game_detail_has_no_human_flags() {
        let detail = GameDetail::from(snapshot());
        let value = serde_json::to_value(&detail).unwrap();

        assert_eq!(value["askerId"], "p1");
        assert_eq!(value["answersReceived"], 4);
        assert_eq!(value["players"][1]["status"], "eliminated");
        let seat = value["players"][0].as_object().unwrap();
        assert!(!seat.contains_key("isHuman"));
        assert!(!seat.contains_key("is_human"));
    }

    #[test]
    fn test_error_response_serialization() {
        let error = ErrorResponse {
            message: "Game not found".to_string(),
        };

        let json = serde_json::to_string(&error).unwrap();
        assert_eq!(json, r#"{"message":"Game not found"}"#);
    }
}
