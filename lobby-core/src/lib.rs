//! SimLobby Core Library
//!
//! This crate provides the data model, static catalogs and the deterministic
//! logic behind the simulator lobby: the session state machine, the bounded
//! telemetry walk and the rank calculator. It has no runtime dependencies;
//! timers and I/O live in `sim-lobby-server`.

pub mod catalog;
pub mod error;
pub mod model;
pub mod rank;
pub mod roster;
pub mod session;
pub mod telemetry;
pub mod units;

pub use catalog::Catalogs;
pub use error::LobbyError;
pub use model::{LocationId, SessionSnapshot, VehicleId};
pub use rank::{RankProgress, RankTable};
pub use roster::RosterFeed;
pub use session::SessionController;
pub use telemetry::TelemetryProfile;
