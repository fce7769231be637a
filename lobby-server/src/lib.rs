//! SimLobby Server Library
//!
//! Exposes server components for integration testing.

pub mod api;
pub mod config;
pub mod lobby;
pub mod state;
pub mod ticker;
