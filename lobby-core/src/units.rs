//! Typed readout values
//!
//! Newtype wrappers keep the three telemetry channels from being mixed up.
//! All readouts serialize with 2 decimal places to keep snapshots compact.

use serde::{Deserialize, Serialize};

/// Round f64 to 2 decimal places for compact JSON serialization
fn round2<S: serde::Serializer>(val: &f64, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64((*val * 100.0).round() / 100.0)
}

/// Kilometers per hour
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct KilometersPerHour(#[serde(serialize_with = "round2")] pub f64);

/// Meters (altitude)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Meters(#[serde(serialize_with = "round2")] pub f64);

/// Percentage (0.0 to 100.0)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Percent(#[serde(serialize_with = "round2")] pub f64);

impl Percent {
    /// Create a percentage, clamping to [0.0, 100.0]
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, 100.0))
    }
}

/// Kilometers (roster distances, pilot statistics)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Kilometers(#[serde(serialize_with = "round2")] pub f64);
