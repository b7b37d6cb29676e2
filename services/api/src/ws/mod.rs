//! WebSocket Game Connections
//!
//! - `protocol`: the JSON messages clients send.
//! - `session`: connection lifecycle, from upgrade to disconnect.

pub mod protocol;
pub mod session;

pub use session::ws_handler;
