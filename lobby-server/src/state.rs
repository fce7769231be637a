//! Application state management

use crate::config::LobbyConfig;
use crate::lobby::Lobby;
use sim_lobby_core::catalog::builtin_pilot_stats;
use sim_lobby_core::model::PilotStats;
use sim_lobby_core::roster::{RosterFeed, StaticRoster};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The session and its catalogs
    pub lobby: Lobby,

    /// Source of the "players online" list
    pub roster: Arc<RwLock<Box<dyn RosterFeed>>>,

    /// Lifetime statistics of the local pilot
    pub stats: Arc<PilotStats>,
}

impl AppState {
    pub fn new(lobby: Lobby) -> Self {
        Self {
            lobby,
            roster: Arc::new(RwLock::new(Box::new(StaticRoster::default()))),
            stats: Arc::new(builtin_pilot_stats()),
        }
    }

    /// Build the state described by `config`
    pub fn from_config(config: &LobbyConfig) -> anyhow::Result<Self> {
        let lobby = Lobby::with_profile(config.profile(), config.initial_xp, config.seed)?;
        Ok(Self::new(lobby))
    }

    /// Replace the roster feed
    pub async fn set_roster_feed(&self, feed: Box<dyn RosterFeed>) {
        let mut roster = self.roster.write().await;
        *roster = feed;
    }
}
