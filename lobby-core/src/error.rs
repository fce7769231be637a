//! Error taxonomy for the lobby core

use thiserror::Error;

/// Errors surfaced by lobby operations
///
/// All of them are local and recoverable: the operation that raised one
/// leaves the session state untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LobbyError {
    /// A selection named an identifier outside its catalog
    #[error("unknown {kind} '{id}'")]
    InvalidSelection { kind: &'static str, id: String },

    #[error("no vehicle selected")]
    NoVehicleSelected,

    #[error("a session is already running")]
    AlreadyRunning,

    /// XP beyond the topmost tier of a bounded rank table
    #[error("xp {xp} is above the highest rank bound {max}")]
    XpOutOfRange { xp: u64, max: u64 },

    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("invalid rank table: {0}")]
    InvalidRankTable(String),

    #[error("invalid telemetry profile: {0}")]
    InvalidProfile(String),
}
