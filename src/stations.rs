/// Station registry for the Hawaiian surf buoy network.
///
/// Defines the canonical list of wave buoys this service normalizes, along
/// with the hand-maintained reference metadata forecasters use to read them:
/// the order in which a north-west swell reaches each buoy and the rough
/// propagation delay from Pauwela (north shore Maui).
/// This is the single source of truth for station ids; all other modules
/// should reference stations from here rather than hardcoding ids.

use crate::model::RelativeHours;

// ---------------------------------------------------------------------------
// Station metadata
// ---------------------------------------------------------------------------

/// Metadata for a single wave buoy.
pub struct Station {
    /// NDBC / CDIP station id as used by the surfbuoys API.
    pub station_id: &'static str,
    /// Display name used as the key in normalized output.
    pub name: &'static str,
    /// Where a NW swell reaches this buoy relative to the others (1 = first).
    /// Buoys that do not see NW swells have no rank.
    pub arrival_order: Option<u32>,
    /// Approximate hours between this buoy and Pauwela for the same swell.
    pub relative_hours: RelativeHours,
    /// Human-readable description of the buoy's role in the forecast.
    pub description: &'static str,
}

/// All wave buoys read by the forecast, ordered by NW-swell arrival.
pub static STATION_REGISTRY: &[Station] = &[
    Station {
        station_id: "51101",
        name: "H2NorthWest",
        arrival_order: Some(1),
        relative_hours: RelativeHours::Hours(24),
        description: "Offshore buoy NW of Kauai. First to register an \
                      incoming NW swell, roughly a day ahead of Pauwela.",
    },
    Station {
        station_id: "51208",
        name: "Hanalei",
        arrival_order: Some(2),
        relative_hours: RelativeHours::Hours(12),
        description: "Kauai north shore.",
    },
    Station {
        station_id: "51201",
        name: "Waimea",
        arrival_order: Some(3),
        relative_hours: RelativeHours::Hours(6),
        description: "Oahu north shore, ~6 hours ahead of Pauwela.",
    },
    Station {
        station_id: "51210",
        name: "Kaneohe",
        arrival_order: Some(4),
        relative_hours: RelativeHours::NotApplicable,
        description: "Windward Oahu. Shares arrival rank with Mokapu.",
    },
    Station {
        station_id: "51202",
        name: "Mokapu",
        arrival_order: Some(4),
        relative_hours: RelativeHours::NotApplicable,
        description: "Windward Oahu, Mokapu Point.",
    },
    Station {
        station_id: "51205",
        name: "Pauwela",
        arrival_order: Some(5),
        relative_hours: RelativeHours::Hours(0),
        description: "Maui north shore. Reference buoy for relative timing.",
    },
    Station {
        station_id: "51213",
        name: "Kaumalapau, (Buoy for SouthSwells!)",
        arrival_order: None,
        relative_hours: RelativeHours::NotApplicable,
        description: "South side of Lanai. Primary south swell indicator.",
    },
    Station {
        station_id: "51002",
        name: "215NM SSW of Hilo, HI",
        arrival_order: None,
        relative_hours: RelativeHours::NotApplicable,
        description: "Deep-water buoy south of the Big Island.",
    },
];

/// Wind station read by the wind normalizer (Kahului Airport).
pub const WIND_STATION_ID: &str = "KLIH1";

/// Long name of the wind station, used in logs and verification output.
pub const WIND_STATION_NAME: &str = "Kahului Airport";

/// Key the wind readings are published under.
pub const WIND_DISPLAY_NAME: &str = "kahului";

/// Returns the ids of all registry wave buoys, in registry order.
pub fn all_station_ids() -> Vec<&'static str> {
    STATION_REGISTRY.iter().map(|s| s.station_id).collect()
}

/// Looks up a station by id. Returns `None` if not found.
pub fn find_station(station_id: &str) -> Option<&'static Station> {
    STATION_REGISTRY.iter().find(|s| s.station_id == station_id)
}

/// NW-swell arrival rank, or `None` for unranked or unknown stations.
pub fn arrival_order(station_id: &str) -> Option<u32> {
    find_station(station_id).and_then(|s| s.arrival_order)
}

/// Display name for a station, falling back to the id itself.
pub fn station_name(station_id: &str) -> &str {
    find_station(station_id).map(|s| s.name).unwrap_or(station_id)
}

/// Relative hours from Pauwela, `NotApplicable` for unknown stations.
pub fn relative_hours(station_id: &str) -> RelativeHours {
    find_station(station_id)
        .map(|s| s.relative_hours)
        .unwrap_or(RelativeHours::NotApplicable)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
