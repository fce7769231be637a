//! Rank calculator
//!
//! Maps an experience-point total onto an ordered table of tiers and reports
//! how far into the tier the total is.

use crate::error::LobbyError;
use crate::model::RankTier;
use serde::{Deserialize, Serialize};

/// Result of a rank lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankProgress {
    pub tier: RankTier,
    /// Position within the tier, 0.0 to 100.0
    pub progress_percent: f64,
    /// XP still needed to reach the next tier (None on the topmost tier)
    pub xp_to_next: Option<u64>,
    pub next_level: Option<u32>,
}

/// Validated, ordered sequence of rank tiers
///
/// Construction checks that the tiers partition `[0, max_xp]` with no gaps
/// and no overlaps, so a lookup inside that range always finds exactly one
/// tier.
#[derive(Debug, Clone, PartialEq)]
pub struct RankTable {
    tiers: Vec<RankTier>,
}

impl RankTable {
    pub fn new(tiers: Vec<RankTier>) -> Result<Self, LobbyError> {
        let first = tiers
            .first()
            .ok_or_else(|| LobbyError::InvalidRankTable("no tiers".to_string()))?;

        if first.min_xp != 0 {
            return Err(LobbyError::InvalidRankTable(format!(
                "first tier starts at {} instead of 0",
                first.min_xp
            )));
        }

        for tier in &tiers {
            if tier.min_xp > tier.max_xp {
                return Err(LobbyError::InvalidRankTable(format!(
                    "tier {} has inverted bounds {}..={}",
                    tier.level, tier.min_xp, tier.max_xp
                )));
            }
        }

        for pair in tiers.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.level <= prev.level {
                return Err(LobbyError::InvalidRankTable(format!(
                    "level {} follows level {}",
                    next.level, prev.level
                )));
            }
            if prev.max_xp.checked_add(1) != Some(next.min_xp) {
                return Err(LobbyError::InvalidRankTable(format!(
                    "tier {} ends at {} but tier {} starts at {}",
                    prev.level, prev.max_xp, next.level, next.min_xp
                )));
            }
        }

        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[RankTier] {
        &self.tiers
    }

    /// Highest XP value covered by the table
    pub fn max_xp(&self) -> u64 {
        // Non-empty by construction
        self.tiers.last().map(|t| t.max_xp).unwrap_or(0)
    }

    /// Look up the tier containing `xp` and the progress within it
    ///
    /// XP above the topmost bound is reported as `XpOutOfRange` rather than
    /// silently mapped to the first tier.
    pub fn rank_for(&self, xp: u64) -> Result<RankProgress, LobbyError> {
        let index = self
            .tiers
            .iter()
            .position(|t| t.contains(xp))
            .ok_or(LobbyError::XpOutOfRange {
                xp,
                max: self.max_xp(),
            })?;

        let tier = &self.tiers[index];
        let next = self.tiers.get(index + 1);

        Ok(RankProgress {
            tier: tier.clone(),
            progress_percent: progress_within(tier, xp),
            xp_to_next: next.map(|n| n.min_xp - xp),
            next_level: next.map(|n| n.level),
        })
    }
}

fn progress_within(tier: &RankTier, xp: u64) -> f64 {
    let width = (tier.max_xp - tier.min_xp) as f64;
    if width <= 0.0 {
        return 100.0;
    }
    let progress = 100.0 * (xp - tier.min_xp) as f64 / width;
    progress.clamp(0.0, 100.0)
}
