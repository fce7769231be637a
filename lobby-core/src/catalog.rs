//! Static catalogs
//!
//! Vehicles, locations and rank tiers are loaded once at startup and never
//! mutated. The builtin content is what the lobby ships with; [`Catalogs::new`]
//! accepts replacements as long as they satisfy the same invariants.

use crate::error::LobbyError;
use crate::model::*;
use crate::rank::RankTable;
use crate::units::*;
use std::collections::HashSet;

/// Read-only bundle of every catalog the session controller consults
#[derive(Debug, Clone, PartialEq)]
pub struct Catalogs {
    vehicles: Vec<VehicleCatalogEntry>,
    locations: Vec<LocationCatalogEntry>,
    ranks: RankTable,
}

impl Catalogs {
    pub fn new(
        vehicles: Vec<VehicleCatalogEntry>,
        locations: Vec<LocationCatalogEntry>,
        rank_tiers: Vec<RankTier>,
    ) -> Result<Self, LobbyError> {
        if vehicles.is_empty() {
            return Err(LobbyError::InvalidCatalog("no vehicles".to_string()));
        }
        if locations.is_empty() {
            return Err(LobbyError::InvalidCatalog("no locations".to_string()));
        }

        let mut seen = HashSet::new();
        for vehicle in &vehicles {
            if !seen.insert(vehicle.id) {
                return Err(LobbyError::InvalidCatalog(format!(
                    "duplicate vehicle '{}'",
                    vehicle.id
                )));
            }
            let stats = vehicle.stats;
            if stats.speed > 100 || stats.handling > 100 || stats.difficulty > 100 {
                return Err(LobbyError::InvalidCatalog(format!(
                    "vehicle '{}' has a stat above 100",
                    vehicle.id
                )));
            }
        }

        let mut seen = HashSet::new();
        for location in &locations {
            if !seen.insert(location.id) {
                return Err(LobbyError::InvalidCatalog(format!(
                    "duplicate location '{}'",
                    location.id
                )));
            }
            if !(1..=5).contains(&location.difficulty) {
                return Err(LobbyError::InvalidCatalog(format!(
                    "location '{}' difficulty {} outside 1-5",
                    location.id, location.difficulty
                )));
            }
        }

        Ok(Self {
            vehicles,
            locations,
            ranks: RankTable::new(rank_tiers)?,
        })
    }

    /// The catalogs the lobby ships with
    pub fn builtin() -> Result<Self, LobbyError> {
        Self::new(builtin_vehicles(), builtin_locations(), builtin_rank_tiers())
    }

    pub fn vehicles(&self) -> &[VehicleCatalogEntry] {
        &self.vehicles
    }

    pub fn locations(&self) -> &[LocationCatalogEntry] {
        &self.locations
    }

    pub fn ranks(&self) -> &RankTable {
        &self.ranks
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&VehicleCatalogEntry> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn location(&self, id: LocationId) -> Option<&LocationCatalogEntry> {
        self.locations.iter().find(|l| l.id == id)
    }

    /// First location entry; selected before the user picks one
    pub fn default_location(&self) -> LocationId {
        // Non-empty by construction
        self.locations
            .first()
            .map(|l| l.id)
            .unwrap_or(LocationId::City)
    }
}

// =============================================================================
// Builtin content
// =============================================================================

fn vehicle(
    id: VehicleId,
    name: &str,
    icon: &str,
    description: &str,
    (speed, handling, difficulty): (u8, u8, u8),
) -> VehicleCatalogEntry {
    VehicleCatalogEntry {
        id,
        name: name.to_string(),
        icon: icon.to_string(),
        description: description.to_string(),
        stats: VehicleStats {
            speed,
            handling,
            difficulty,
        },
    }
}

pub fn builtin_vehicles() -> Vec<VehicleCatalogEntry> {
    vec![
        vehicle(VehicleId::Car,        "Суперкар", "Car",   "Мощный спортивный автомобиль с невероятной скоростью", (95, 85, 40)),
        vehicle(VehicleId::Plane,      "Самолёт",  "Plane", "Реактивный истребитель с высокой манёвренностью",     (100, 70, 80)),
        vehicle(VehicleId::Helicopter, "Вертолёт", "Plane", "Боевой вертолёт для сложных манёвров",                 (75, 90, 70)),
        vehicle(VehicleId::Ship,       "Катер",    "Waves", "Скоростной катер для покорения водной стихии",         (80, 75, 50)),
    ]
}

fn location(
    id: LocationId,
    name: &str,
    icon: &str,
    description: &str,
    difficulty: u8,
    weather: &str,
    gradient: &str,
) -> LocationCatalogEntry {
    LocationCatalogEntry {
        id,
        name: name.to_string(),
        icon: icon.to_string(),
        description: description.to_string(),
        difficulty,
        weather: weather.to_string(),
        gradient: gradient.to_string(),
    }
}

pub fn builtin_locations() -> Vec<LocationCatalogEntry> {
    vec![
        location(LocationId::City,      "Мегаполис",      "Building2", "Ночной город с плотным трафиком",       2, "Ясно",     "from-blue-900 to-slate-900"),
        location(LocationId::Mountains, "Горный перевал", "Mountain",  "Узкие серпантины и резкие перепады высот", 4, "Туман",    "from-slate-700 to-emerald-900"),
        location(LocationId::Ocean,     "Открытый океан", "Waves",     "Бескрайняя водная гладь и штормовые волны", 3, "Шторм",    "from-cyan-800 to-blue-950"),
        location(LocationId::Desert,    "Пустыня",        "Sun",       "Раскалённые дюны и песчаные бури",       3, "Жара",     "from-amber-600 to-orange-900"),
        location(LocationId::Arctic,    "Арктика",        "Snowflake", "Ледяные просторы на краю света",         5, "Метель",   "from-sky-200 to-indigo-900"),
    ]
}

fn rank_tier(level: u32, name: &str, min_xp: u64, max_xp: u64, color: &str, icon: &str) -> RankTier {
    RankTier {
        level,
        name: name.to_string(),
        min_xp,
        max_xp,
        color: color.to_string(),
        icon: icon.to_string(),
    }
}

pub fn builtin_rank_tiers() -> Vec<RankTier> {
    vec![
        rank_tier(1, "Новичок",  0,      999,      "gray",   "User"),
        rank_tier(2, "Любитель", 1_000,  2_999,    "green",  "Award"),
        rank_tier(3, "Профи",    3_000,  5_999,    "blue",   "Medal"),
        rank_tier(4, "Эксперт",  6_000,  9_999,    "purple", "Star"),
        rank_tier(5, "Мастер",   10_000, 19_999,   "orange", "Trophy"),
        rank_tier(6, "Легенда",  20_000, u64::MAX, "gold",   "Crown"),
    ]
}

pub fn builtin_roster() -> Vec<PlayerRosterEntry> {
    let player = |id: u32, name: &str, vehicle: &str, distance: f64, rank: &str| PlayerRosterEntry {
        id,
        name: name.to_string(),
        vehicle: vehicle.to_string(),
        distance: Kilometers(distance),
        rank: rank.to_string(),
    };

    vec![
        player(1, "SpeedRacer_Pro", "Суперкар", 2.4, "Профи"),
        player(2, "SkyMaster_99",   "Самолёт",  5.1, "Эксперт"),
        player(3, "NavyCaptain",    "Катер",    3.7, "Любитель"),
        player(4, "HeliPilot_X",    "Вертолёт", 4.2, "Мастер"),
    ]
}

pub fn builtin_pilot_stats() -> PilotStats {
    PilotStats {
        distance: Kilometers(324.8),
        distance_progress: Percent::new(65.0),
        play_time_minutes: 12 * 60 + 34,
        play_time_progress: Percent::new(45.0),
        achievements_unlocked: 18,
        achievements_total: 50,
    }
}
