//! Turing Hunt Core
//!
//! Game-session engine for a social deduction game in which humans and AI
//! players take turns asking, answering and voting each other out. This crate
//! holds everything that decides the game: the roster, the phase state machine,
//! vote resolution, the AI action gateway and client resync. It knows nothing
//! about websockets; the `turing-api` service maps [`events::Outbound`] messages
//! onto connections.

pub mod agent;
pub mod cosmetics;
pub mod engine;
pub mod error;
pub mod events;
pub mod fallback;
pub mod gateway;
pub mod lifecycle;
pub mod manager;
pub mod moderation;
pub mod player;
pub mod prompts;
pub mod rules;
pub mod sync;
pub mod votes;

pub use engine::{ClientInput, SessionHandle, SessionServices, SessionSnapshot, spawn_session};
pub use error::{SessionError, SubmissionError};
pub use events::{GameMode, Outbound, Phase, Recipient, ServerEvent, SessionId};
pub use manager::{NoopHooks, SessionHooks, SessionManager};
pub use player::PlayerId;
