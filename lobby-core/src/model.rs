//! Lobby data model
//!
//! Catalog records are immutable once loaded. `SessionState` is the only
//! mutable record and is owned by [`crate::session::SessionController`].

use crate::error::LobbyError;
use crate::rank::RankProgress;
use crate::units::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Identifiers
// =============================================================================

/// Closed set of selectable vehicles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleId {
    Car,
    Plane,
    Helicopter,
    Ship,
}

impl VehicleId {
    pub const ALL: [VehicleId; 4] = [Self::Car, Self::Plane, Self::Helicopter, Self::Ship];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Plane => "plane",
            Self::Helicopter => "helicopter",
            Self::Ship => "ship",
        }
    }
}

impl FromStr for VehicleId {
    type Err = LobbyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| LobbyError::InvalidSelection {
                kind: "vehicle",
                id: s.to_string(),
            })
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of selectable locations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationId {
    City,
    Mountains,
    Ocean,
    Desert,
    Arctic,
}

impl LocationId {
    pub const ALL: [LocationId; 5] = [
        Self::City,
        Self::Mountains,
        Self::Ocean,
        Self::Desert,
        Self::Arctic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::City => "city",
            Self::Mountains => "mountains",
            Self::Ocean => "ocean",
            Self::Desert => "desert",
            Self::Arctic => "arctic",
        }
    }
}

impl FromStr for LocationId {
    type Err = LobbyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| LobbyError::InvalidSelection {
                kind: "location",
                id: s.to_string(),
            })
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Catalog records
// =============================================================================

/// Handling characteristics shown on the vehicle card, each 0-100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleStats {
    pub speed: u8,
    pub handling: u8,
    pub difficulty: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleCatalogEntry {
    pub id: VehicleId,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub stats: VehicleStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCatalogEntry {
    pub id: LocationId,
    pub name: String,
    pub icon: String,
    pub description: String,
    /// 1 (easiest) to 5 (hardest)
    pub difficulty: u8,
    pub weather: String,
    pub gradient: String,
}

/// One contiguous, inclusive XP range mapped to a rank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankTier {
    pub level: u32,
    pub name: String,
    pub min_xp: u64,
    pub max_xp: u64,
    pub color: String,
    pub icon: String,
}

impl RankTier {
    pub fn contains(&self, xp: u64) -> bool {
        self.min_xp <= xp && xp <= self.max_xp
    }
}

/// A player shown in the "online" list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRosterEntry {
    pub id: u32,
    pub name: String,
    pub vehicle: String,
    pub distance: Kilometers,
    pub rank: String,
}

/// Lifetime statistics card of the local pilot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PilotStats {
    pub distance: Kilometers,
    pub distance_progress: Percent,
    pub play_time_minutes: u32,
    pub play_time_progress: Percent,
    pub achievements_unlocked: u32,
    pub achievements_total: u32,
}

impl PilotStats {
    pub fn achievements_progress(&self) -> Percent {
        if self.achievements_total == 0 {
            return Percent::new(0.0);
        }
        Percent::new(100.0 * self.achievements_unlocked as f64 / self.achievements_total as f64)
    }
}

// =============================================================================
// Session state
// =============================================================================

/// Current readouts of the three telemetry channels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Readouts {
    pub speed: KilometersPerHour,
    pub altitude: Meters,
    pub fuel: Percent,
}

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Vehicle and location selection
    Lobby,
    /// Session started, telemetry ticking
    Running,
    /// Session started, generator reached its duration; readouts are frozen
    Finished,
}

/// Mutable session record
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub selected_vehicle: Option<VehicleId>,
    pub selected_location: LocationId,
    pub running: bool,
    /// Whether the generator is still producing ticks for this session
    pub ticking: bool,
    pub session_id: u64,
    pub started_at: Option<DateTime<Utc>>,
    pub ticks: u32,
    pub speed: f64,
    pub altitude: f64,
    pub fuel: f64,
    pub xp: u64,
    pub sound_enabled: bool,
}

impl SessionState {
    pub fn phase(&self) -> SessionPhase {
        match (self.running, self.ticking) {
            (false, _) => SessionPhase::Lobby,
            (true, true) => SessionPhase::Running,
            (true, false) => SessionPhase::Finished,
        }
    }

    pub fn readouts(&self) -> Readouts {
        Readouts {
            speed: KilometersPerHour(self.speed),
            altitude: Meters(self.altitude),
            fuel: Percent::new(self.fuel),
        }
    }
}

/// Serializable view of the session handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// When this snapshot was taken
    pub timestamp: DateTime<Utc>,
    pub session_id: u64,
    pub phase: SessionPhase,
    pub vehicle: Option<VehicleId>,
    pub location: LocationId,
    pub running: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub ticks: u32,
    pub readouts: Readouts,
    pub xp: u64,
    pub rank: Option<RankProgress>,
    /// Why `rank` is missing, when the XP falls outside the rank table
    pub rank_error: Option<String>,
    pub sound_enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_id_parse() {
        assert_eq!("car".parse::<VehicleId>(), Ok(VehicleId::Car));
        assert_eq!("helicopter".parse::<VehicleId>(), Ok(VehicleId::Helicopter));
        assert_eq!(
            "bogus-id".parse::<VehicleId>(),
            Err(LobbyError::InvalidSelection {
                kind: "vehicle",
                id: "bogus-id".to_string()
            })
        );
    }

    #[test]
    fn test_location_id_parse() {
        assert_eq!("arctic".parse::<LocationId>(), Ok(LocationId::Arctic));
        assert!("Arctic".parse::<LocationId>().is_err());
    }

    #[test]
    fn test_id_serialization_matches_as_str() {
        for id in VehicleId::ALL {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
        }
        for id in LocationId::ALL {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id));
        }
    }

    #[test]
    fn test_phase_derivation() {
        let mut state = SessionState {
            selected_vehicle: Some(VehicleId::Car),
            selected_location: LocationId::City,
            running: false,
            ticking: false,
            session_id: 0,
            started_at: None,
            ticks: 0,
            speed: 0.0,
            altitude: 0.0,
            fuel: 100.0,
            xp: 0,
            sound_enabled: true,
        };
        assert_eq!(state.phase(), SessionPhase::Lobby);

        state.running = true;
        state.ticking = true;
        assert_eq!(state.phase(), SessionPhase::Running);

        state.ticking = false;
        assert_eq!(state.phase(), SessionPhase::Finished);
    }

    #[test]
    fn test_achievements_progress() {
        let stats = PilotStats {
            distance: Kilometers(324.8),
            distance_progress: Percent::new(65.0),
            play_time_minutes: 754,
            play_time_progress: Percent::new(45.0),
            achievements_unlocked: 18,
            achievements_total: 50,
        };
        assert!((stats.achievements_progress().0 - 36.0).abs() < 1e-9);
    }
}
