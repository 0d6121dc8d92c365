/// Wind-station normalizer.
///
/// Extracts the Kahului Airport (`KLIH1`) wind readings from a raw document,
/// orders them by parsed timestamp and publishes the first few under the
/// `kahului` key. Unlike the wave path this one never aborts on a bad
/// reading: unparsable timestamps sort first and malformed numbers become
/// null.

use crate::coerce::{self, FieldRef, Strictness};
use crate::logging::{self, DataSource};
use crate::model::{BuoyError, RawDocument, RawMeasurement, WindDocument, WindReading};
use crate::stations::WIND_DISPLAY_NAME;

/// Readings kept when no count is configured.
pub const DEFAULT_WIND_READINGS: usize = 6;

/// Normalizes `station_id`'s readings from `doc` into a single-key document.
///
/// A station missing from the document yields an empty reading list.
pub fn normalize_wind(
    doc: &RawDocument,
    station_id: &str,
    num_readings: usize,
) -> Result<WindDocument, BuoyError> {
    let mut measurements = match doc.station(station_id)? {
        Some(m) => m,
        None => {
            logging::warn(
                DataSource::Wind,
                Some(station_id),
                "station not present in input, publishing no readings",
            );
            Vec::new()
        }
    };

    // Stable; entries without a usable GMT share the minimum key.
    measurements.sort_by_key(|m| coerce::timestamp_sort_key(m.gmt.as_ref()));
    measurements.truncate(num_readings);

    let readings = measurements
        .iter()
        .map(|m| wind_reading(station_id, m))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(WindDocument {
        display_name: WIND_DISPLAY_NAME.to_string(),
        readings,
    })
}

fn wind_reading(station_id: &str, m: &RawMeasurement) -> Result<WindReading, BuoyError> {
    let speed = FieldRef { station: station_id, field: "windSpeed" };
    let gust = FieldRef { station: station_id, field: "windGust" };

    Ok(WindReading {
        timestamp_utc: m.gmt.clone(),
        wind_direction: m.wind_dir.clone(),
        wind_speed: coerce::coerce_number(m.wind_speed.as_ref(), Strictness::Lenient, speed)?,
        wind_gust: coerce::coerce_number(m.wind_gust.as_ref(), Strictness::Lenient, gust)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stations::WIND_STATION_ID;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> RawDocument {
        RawDocument::from_json(&value.to_string()).expect("test document should parse")
    }

    #[test]
    fn test_bad_timestamp_sorts_first_and_bad_speed_is_null() {
        let raw = doc(json!({"KLIH1": [
            {"GMT": "2024-01-01T00:00:00Z", "windSpeed": "oops"},
            {"GMT": "bad", "windSpeed": "12.5"}
        ]}));

        let out = normalize_wind(&raw, WIND_STATION_ID, DEFAULT_WIND_READINGS)
            .expect("per-record problems must not be fatal");

        assert_eq!(out.readings.len(), 2);
        assert_eq!(out.readings[0].timestamp_utc, Some(json!("bad")));
        assert_eq!(out.readings[0].wind_speed, Some(12.5));
        assert_eq!(out.readings[1].timestamp_utc, Some(json!("2024-01-01T00:00:00Z")));
        assert_eq!(out.readings[1].wind_speed, None);
    }

    #[test]
    fn test_missing_station_yields_empty_list() {
        let raw = doc(json!({"51205": []}));
        let out = normalize_wind(&raw, WIND_STATION_ID, 6).unwrap();
        assert_eq!(serde_json::to_value(&out).unwrap(), json!({"kahului": []}));
    }

    #[test]
    fn test_sorts_by_parsed_instant_not_string() {
        // Lexically "2024-01-01 09:00" < "2024-01-01T08:00:00Z", but the
        // parsed instants order the other way.
        let raw = doc(json!({"KLIH1": [
            {"GMT": "2024-01-01 09:00", "windSpeed": "2"},
            {"GMT": "2024-01-01T08:00:00Z", "windSpeed": "1"}
        ]}));
        let out = normalize_wind(&raw, WIND_STATION_ID, 6).unwrap();
        let speeds: Vec<_> = out.readings.iter().map(|r| r.wind_speed).collect();
        assert_eq!(speeds, vec![Some(1.0), Some(2.0)]);
    }

    #[test]
    fn test_unparsable_entries_keep_relative_order() {
        let raw = doc(json!({"KLIH1": [
            {"GMT": "2024-01-01T00:00:00Z", "windDir": "c"},
            {"GMT": "nope", "windDir": "a"},
            {"windDir": "b"}
        ]}));
        let out = normalize_wind(&raw, WIND_STATION_ID, 6).unwrap();
        let dirs: Vec<_> = out
            .readings
            .iter()
            .map(|r| r.wind_direction.clone().unwrap())
            .collect();
        assert_eq!(dirs, vec![json!("a"), json!("b"), json!("c")]);
        assert_eq!(out.readings[1].timestamp_utc, None, "missing GMT stays null");
    }

    #[test]
    fn test_trims_to_requested_count() {
        let readings: Vec<_> = (0..10)
            .map(|h| json!({"GMT": format!("2024-01-01T{:02}:00:00Z", h), "windSpeed": "5"}))
            .collect();
        let raw = doc(json!({ "KLIH1": readings }));
        let out = normalize_wind(&raw, WIND_STATION_ID, 6).unwrap();
        assert_eq!(out.readings.len(), 6);
        assert_eq!(out.readings[5].timestamp_utc, Some(json!("2024-01-01T05:00:00Z")));
    }

    #[test]
    fn test_timestamp_is_not_reformatted() {
        let raw = doc(json!({"KLIH1": [{"GMT": "2024-01-01 06:30", "windGust": "20"}]}));
        let out = normalize_wind(&raw, WIND_STATION_ID, 6).unwrap();
        assert_eq!(out.readings[0].timestamp_utc, Some(json!("2024-01-01 06:30")));
        assert_eq!(out.readings[0].wind_gust, Some(20.0));
    }

    #[test]
    fn test_other_stations_are_ignored_even_if_malformed() {
        let raw = doc(json!({"51205": "offline", "KLIH1": []}));
        assert!(normalize_wind(&raw, WIND_STATION_ID, 6).is_ok());
    }
}
