//! Defines the messages a browser client sends. Server-to-client messages are
//! [`turing_core::ServerEvent`] values, serialized as-is.

use serde::Deserialize;
use turing_core::events::Phase;
use turing_core::{ClientInput, PlayerId};

/// Messages sent from the client (browser) to the server.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    SubmitQuestion { text: String },
    SubmitAnswer { text: String },
    /// A missing or null target is an abstention.
    SubmitVote { target_id: Option<PlayerId> },
    /// Sent once the client has rendered a `new_round_phase`.
    PhaseAck {
        round: Option<u32>,
        phase: Option<Phase>,
    },
    /// Periodic report of what the client is showing.
    Heartbeat {
        round: Option<u32>,
        phase: Option<Phase>,
    },
}

impl From<ClientMessage> for ClientInput {
    fn from(message: ClientMessage) -> Self {
        match message {
            ClientMessage::SubmitQuestion { text } => ClientInput::SubmitQuestion(text),
            ClientMessage::SubmitAnswer { text } => ClientInput::SubmitAnswer(text),
            ClientMessage::SubmitVote { target_id } => ClientInput::SubmitVote(target_id),
            ClientMessage::PhaseAck { round, phase } => ClientInput::PhaseAck { round, phase },
            ClientMessage::Heartbeat { round, phase } => ClientInput::Heartbeat { round, phase },
        }
    }
}
