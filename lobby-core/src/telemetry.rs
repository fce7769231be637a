//! Telemetry walk
//!
//! Each channel performs a one-directional random walk: every tick draws a
//! uniform delta in `[0, |step|)`, applies it in the direction of `step` and
//! clamps to the channel bounds. Speed and altitude saturate at their ceiling,
//! fuel depletes towards its floor.

use crate::error::LobbyError;
use crate::model::SessionState;
use rand::Rng;
use std::time::Duration;

/// Tick period of the reference lobby
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(500);

/// How long a session keeps ticking before readouts freeze
pub const DEFAULT_ACTIVE_DURATION: Duration = Duration::from_secs(30);

/// One bounded readout channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelSpec {
    pub floor: f64,
    pub ceiling: f64,
    /// Value the channel is reset to on session start and end
    pub initial: f64,
    /// Largest per-tick delta; the sign gives the direction of travel
    pub step: f64,
}

impl ChannelSpec {
    /// Advance `current` by one random increment and clamp it
    pub fn advance<R: Rng>(&self, current: f64, rng: &mut R) -> f64 {
        let delta = rng.gen_range(0.0..self.step.abs());
        (current + delta.copysign(self.step)).clamp(self.floor, self.ceiling)
    }

    fn validate(&self, name: &str) -> Result<(), LobbyError> {
        let finite = [self.floor, self.ceiling, self.initial, self.step]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(LobbyError::InvalidProfile(format!(
                "{} channel has a non-finite value",
                name
            )));
        }
        if self.floor > self.ceiling {
            return Err(LobbyError::InvalidProfile(format!(
                "{} floor {} is above ceiling {}",
                name, self.floor, self.ceiling
            )));
        }
        if !(self.floor..=self.ceiling).contains(&self.initial) {
            return Err(LobbyError::InvalidProfile(format!(
                "{} initial value {} is outside its bounds",
                name, self.initial
            )));
        }
        if self.step == 0.0 {
            return Err(LobbyError::InvalidProfile(format!(
                "{} step must be non-zero",
                name
            )));
        }
        Ok(())
    }
}

/// Timing and channel layout of the telemetry generator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryProfile {
    pub tick_period: Duration,
    /// Total time a session produces ticks for
    pub active_duration: Duration,
    /// km/h
    pub speed: ChannelSpec,
    /// meters
    pub altitude: ChannelSpec,
    /// percent of a full tank
    pub fuel: ChannelSpec,
}

impl Default for TelemetryProfile {
    fn default() -> Self {
        Self {
            tick_period: DEFAULT_TICK_PERIOD,
            active_duration: DEFAULT_ACTIVE_DURATION,
            speed: ChannelSpec {
                floor: 0.0,
                ceiling: 280.0,
                initial: 0.0,
                step: 10.0,
            },
            altitude: ChannelSpec {
                floor: 0.0,
                ceiling: 10_000.0,
                initial: 0.0,
                step: 50.0,
            },
            fuel: ChannelSpec {
                floor: 0.0,
                ceiling: 100.0,
                initial: 100.0,
                step: -0.5,
            },
        }
    }
}

impl TelemetryProfile {
    /// Same channels with different timing
    pub fn with_timing(tick_period: Duration, active_duration: Duration) -> Self {
        Self {
            tick_period,
            active_duration,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), LobbyError> {
        if self.tick_period.is_zero() {
            return Err(LobbyError::InvalidProfile(
                "tick period must be non-zero".to_string(),
            ));
        }
        self.speed.validate("speed")?;
        self.altitude.validate("altitude")?;
        self.fuel.validate("fuel")?;
        Ok(())
    }

    /// Number of ticks a session receives before the generator stops
    pub fn ticks_per_session(&self) -> u32 {
        let period = self.tick_period.as_nanos().max(1);
        u32::try_from(self.active_duration.as_nanos() / period).unwrap_or(u32::MAX)
    }

    /// Put all channels back at their initial values
    pub fn reset(&self, state: &mut SessionState) {
        state.speed = self.speed.initial;
        state.altitude = self.altitude.initial;
        state.fuel = self.fuel.initial;
        state.ticks = 0;
    }

    /// Apply one tick to all three channels
    pub fn tick<R: Rng>(&self, state: &mut SessionState, rng: &mut R) {
        state.speed = self.speed.advance(state.speed, rng);
        state.altitude = self.altitude.advance(state.altitude, rng);
        state.fuel = self.fuel.advance(state.fuel, rng);
        state.ticks = state.ticks.saturating_add(1);
    }
}
