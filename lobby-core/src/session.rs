//! Session controller
//!
//! Owns the [`SessionState`] and funnels every mutation through its methods.
//! The controller is synchronous: the server drives [`SessionController::tick`]
//! from a timer and serializes it with user actions.
//!
//! Lifecycle:
//! - `Lobby --start_session()--> Running` (requires a selected vehicle)
//! - `Running --duration elapsed--> Finished` (readouts freeze, still running)
//! - `Running | Finished --end_session()--> Lobby`

use crate::catalog::Catalogs;
use crate::error::LobbyError;
use crate::model::*;
use crate::rank::RankProgress;
use crate::telemetry::TelemetryProfile;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// XP granted every time a session starts
pub const SESSION_XP_AWARD: u64 = 50;

/// XP the pilot starts with
pub const DEFAULT_INITIAL_XP: u64 = 4_200;

pub struct SessionController {
    catalogs: Arc<Catalogs>,
    profile: TelemetryProfile,
    state: SessionState,
    rng: StdRng,
}

impl SessionController {
    pub fn new(
        catalogs: Arc<Catalogs>,
        profile: TelemetryProfile,
        initial_xp: u64,
        seed: Option<u64>,
    ) -> Result<Self, LobbyError> {
        profile.validate()?;

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut state = SessionState {
            selected_vehicle: None,
            selected_location: catalogs.default_location(),
            running: false,
            ticking: false,
            session_id: 0,
            started_at: None,
            ticks: 0,
            speed: 0.0,
            altitude: 0.0,
            fuel: 0.0,
            xp: initial_xp,
            sound_enabled: true,
        };
        profile.reset(&mut state);

        Ok(Self {
            catalogs,
            profile,
            state,
            rng,
        })
    }

    /// Controller over the builtin catalogs and default profile
    pub fn with_defaults(seed: Option<u64>) -> Result<Self, LobbyError> {
        Self::new(
            Arc::new(Catalogs::builtin()?),
            TelemetryProfile::default(),
            DEFAULT_INITIAL_XP,
            seed,
        )
    }

    pub fn catalogs(&self) -> &Arc<Catalogs> {
        &self.catalogs
    }

    pub fn profile(&self) -> &TelemetryProfile {
        &self.profile
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Select a vehicle by identifier
    ///
    /// Unknown identifiers are rejected and the previous selection is kept.
    pub fn select_vehicle(&mut self, id: &str) -> Result<VehicleId, LobbyError> {
        let vehicle: VehicleId = id.parse()?;
        if self.catalogs.vehicle(vehicle).is_none() {
            return Err(LobbyError::InvalidSelection {
                kind: "vehicle",
                id: id.to_string(),
            });
        }
        self.state.selected_vehicle = Some(vehicle);
        Ok(vehicle)
    }

    /// Select a location by identifier
    pub fn select_location(&mut self, id: &str) -> Result<LocationId, LobbyError> {
        let location: LocationId = id.parse()?;
        if self.catalogs.location(location).is_none() {
            return Err(LobbyError::InvalidSelection {
                kind: "location",
                id: id.to_string(),
            });
        }
        self.state.selected_location = location;
        Ok(location)
    }

    /// Enter the running state
    ///
    /// Grants [`SESSION_XP_AWARD`], resets the readouts and returns the id of
    /// the new session. The caller is responsible for starting the ticker.
    pub fn start_session(&mut self) -> Result<u64, LobbyError> {
        if self.state.selected_vehicle.is_none() {
            return Err(LobbyError::NoVehicleSelected);
        }
        if self.state.running {
            return Err(LobbyError::AlreadyRunning);
        }

        self.profile.reset(&mut self.state);
        self.state.running = true;
        self.state.ticking = true;
        self.state.xp = self.state.xp.saturating_add(SESSION_XP_AWARD);
        self.state.session_id += 1;
        self.state.started_at = Some(Utc::now());

        Ok(self.state.session_id)
    }

    /// Return to the lobby; idempotent
    pub fn end_session(&mut self) {
        self.state.running = false;
        self.state.ticking = false;
        self.state.started_at = None;
        self.profile.reset(&mut self.state);
    }

    /// Flip the sound preference and return the new value
    pub fn toggle_sound(&mut self) -> bool {
        self.state.sound_enabled = !self.state.sound_enabled;
        self.state.sound_enabled
    }

    /// Apply one telemetry tick
    ///
    /// Returns false without touching the readouts unless the session is
    /// running and still ticking.
    pub fn tick(&mut self) -> bool {
        if !(self.state.running && self.state.ticking) {
            return false;
        }
        self.profile.tick(&mut self.state, &mut self.rng);
        true
    }

    /// Stop ticking after the active duration; readouts stay where they are
    pub fn finish_ticking(&mut self) {
        self.state.ticking = false;
    }

    pub fn rank(&self) -> Result<RankProgress, LobbyError> {
        self.catalogs.ranks().rank_for(self.state.xp)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = &self.state;
        let (rank, rank_error) = match self.rank() {
            Ok(rank) => (Some(rank), None),
            Err(e) => (None, Some(e.to_string())),
        };
        SessionSnapshot {
            timestamp: Utc::now(),
            session_id: state.session_id,
            phase: state.phase(),
            vehicle: state.selected_vehicle,
            location: state.selected_location,
            running: state.running,
            started_at: state.started_at,
            ticks: state.ticks,
            readouts: state.readouts(),
            xp: state.xp,
            rank,
            rank_error,
            sound_enabled: state.sound_enabled,
        }
    }
}
