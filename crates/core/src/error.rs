use crate::events::{GameMode, SessionId};
use thiserror::Error;

/// Why a human's question or answer was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Text cannot be empty.")]
    Empty,
    #[error("Too long (max {max} characters).")]
    TooLong { max: usize },
    #[error("{0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session {0} not found")]
    NotFound(SessionId),
    #[error("session {0} has already finished")]
    Closed(SessionId),
    #[error("{mode:?} games need {expected} human(s), got {got}")]
    RosterMismatch {
        mode: GameMode,
        expected: usize,
        got: usize,
    },
}
