//! Online player roster feed

use crate::catalog::builtin_roster;
use crate::model::PlayerRosterEntry;

/// Trait for sources of the "players online" list
///
/// The lobby only needs an ordered sequence of entries. The builtin feed is
/// static; a live feed can implement this without touching the session core.
pub trait RosterFeed: Send + Sync {
    /// Get the name of this feed (e.g., "Static")
    fn name(&self) -> &str;

    /// Current roster, in display order
    fn entries(&self) -> Vec<PlayerRosterEntry>;

    fn online_count(&self) -> usize {
        self.entries().len()
    }
}

/// Fixed roster that never changes
pub struct StaticRoster {
    entries: Vec<PlayerRosterEntry>,
}

impl StaticRoster {
    pub fn new(entries: Vec<PlayerRosterEntry>) -> Self {
        Self { entries }
    }
}

impl Default for StaticRoster {
    fn default() -> Self {
        Self::new(builtin_roster())
    }
}

impl RosterFeed for StaticRoster {
    fn name(&self) -> &str {
        "Static"
    }

    fn entries(&self) -> Vec<PlayerRosterEntry> {
        self.entries.clone()
    }
}
