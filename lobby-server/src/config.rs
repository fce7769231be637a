//! Server configuration
//!
//! Every option can be given on the command line or through the matching
//! `SIM_LOBBY_*` environment variable.

use clap::Parser;
use sim_lobby_core::session::DEFAULT_INITIAL_XP;
use sim_lobby_core::telemetry::{DEFAULT_ACTIVE_DURATION, DEFAULT_TICK_PERIOD};
use sim_lobby_core::TelemetryProfile;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

pub const DEFAULT_LISTEN: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 9200));

const DEFAULT_TICK_MS: u64 = DEFAULT_TICK_PERIOD.as_millis() as u64;
const DEFAULT_DURATION_MS: u64 = DEFAULT_ACTIVE_DURATION.as_millis() as u64;

#[derive(Debug, Clone, Parser)]
#[command(name = "sim-lobby", version, about = "Simulator lobby session server")]
pub struct LobbyConfig {
    /// Address the HTTP API listens on
    #[arg(long, env = "SIM_LOBBY_LISTEN", default_value_t = DEFAULT_LISTEN)]
    pub listen: SocketAddr,

    /// Experience points the pilot starts with
    #[arg(long, env = "SIM_LOBBY_INITIAL_XP", default_value_t = DEFAULT_INITIAL_XP)]
    pub initial_xp: u64,

    /// Telemetry tick period in milliseconds
    #[arg(long, env = "SIM_LOBBY_TICK_MS", default_value_t = DEFAULT_TICK_MS)]
    pub tick_ms: u64,

    /// How long a session produces telemetry, in milliseconds
    #[arg(long, env = "SIM_LOBBY_DURATION_MS", default_value_t = DEFAULT_DURATION_MS)]
    pub duration_ms: u64,

    /// Seed for the telemetry RNG (random when omitted)
    #[arg(long, env = "SIM_LOBBY_SEED")]
    pub seed: Option<u64>,
}

impl LobbyConfig {
    pub fn profile(&self) -> TelemetryProfile {
        TelemetryProfile::with_timing(
            Duration::from_millis(self.tick_ms),
            Duration::from_millis(self.duration_ms),
        )
    }
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN,
            initial_xp: DEFAULT_INITIAL_XP,
            tick_ms: DEFAULT_TICK_MS,
            duration_ms: DEFAULT_DURATION_MS,
            seed: None,
        }
    }
}
