//! Turing Hunt API Library Crate
//!
//! Transport around `turing-core`: configuration, the lobby, websocket
//! connections, the read-only REST surface and routing. The `api` binary is a
//! thin wrapper around this library.

pub mod config;
pub mod connections;
pub mod handlers;
pub mod lobby;
pub mod models;
pub mod router;
pub mod state;
pub mod ws;
