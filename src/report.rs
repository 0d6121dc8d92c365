/// Combined surf report.
///
/// Fetches every requested wave buoy and the wind station in one run,
/// normalizes both and publishes a single document: the wave stations keyed
/// by display name followed by the `kahului` wind list. This is the document
/// the daily forecast is written from.

use serde::Serialize;

use crate::config::Config;
use crate::ingest::surfbuoys;
use crate::logging::{self, DataSource};
use crate::model::{BuoyError, RawDocument, WaveDocument, WindDocument};
use crate::normalize::{waves, wind};

/// Wave stations followed by the wind key, flattened into one JSON object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfReport {
    #[serde(flatten)]
    pub waves: WaveDocument,
    #[serde(flatten)]
    pub wind: WindDocument,
}

/// Normalizes already-fetched raw documents into a report using the counts
/// and wind station id from `config`.
pub fn assemble_report(
    waves_raw: &RawDocument,
    wind_raw: &RawDocument,
    config: &Config,
) -> Result<SurfReport, BuoyError> {
    let waves = waves::normalize_waves(waves_raw, config.waves.num_readings)?;
    let wind = wind::normalize_wind(wind_raw, &config.wind.station_id, config.wind.num_readings)?;

    if waves.get(&wind.display_name).is_some() {
        return Err(BuoyError::Parse(format!(
            "wave station '{}' clashes with the wind report key",
            wind.display_name
        )));
    }

    Ok(SurfReport { waves, wind })
}

/// Fetches `wave_ids` and the configured wind station, then assembles the
/// report. Any fetch failure aborts the run before anything is normalized.
pub fn fetch_report(
    client: &reqwest::blocking::Client,
    config: &Config,
    wave_ids: &[&str],
) -> Result<SurfReport, BuoyError> {
    let base_url = config.api.base_url.as_str();

    let waves_raw = surfbuoys::fetch_stations(client, base_url, wave_ids)?;
    let wind_raw = surfbuoys::fetch_wind_station(client, base_url, &config.wind.station_id)?;

    let report = assemble_report(&waves_raw, &wind_raw, config)?;
    logging::info(
        DataSource::System,
        None,
        &format!(
            "report built: {} wave station(s), {} wind reading(s)",
            report.waves.len(),
            report.wind.readings.len()
        ),
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::stub::{local_client, serve};
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawDocument {
        RawDocument::from_json(&value.to_string()).unwrap()
    }

    #[test]
    fn test_report_flattens_waves_then_wind() {
        let mut config = Config::default();
        config.waves.num_readings = 1;
        config.wind.num_readings = 1;

        let report = assemble_report(
            &raw(json!({"51205": [
                {"GMT": "2024-01-02T00:00:00Z", "height": "1.2", "period": "10", "swellDir": "NW"},
                {"GMT": "2024-01-01T00:00:00Z", "height": "1.0", "period": "9", "swellDir": "NW"}
            ]})),
            &raw(json!({"KLIH1": [
                {"GMT": "2024-01-01T01:00:00Z", "windSpeed": "14", "windDir": "ENE"},
                {"GMT": "2024-01-01T00:00:00Z", "windSpeed": "12", "windDir": "NE", "windGust": "20"}
            ]})),
            &config,
        )
        .expect("report should assemble");

        let text = serde_json::to_string(&report).unwrap();
        assert!(text.find("\"Pauwela\"").unwrap() < text.find("\"kahului\"").unwrap());
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "Pauwela": {
                    "arrivalOrder_NW_swell": 5,
                    "relativeHoursFromPauwela": 0,
                    "timeSeries": [{
                        "timestampUTC": "2024-01-01T00:00:00Z",
                        "waveHeight_m": 1.0,
                        "wavePeriod_s": 9.0,
                        "swellDirection": "NW"
                    }]
                },
                "kahului": [{
                    "timestampUTC": "2024-01-01T00:00:00Z",
                    "windDirection": "NE",
                    "windSpeed": 12.0,
                    "windGust": 20.0
                }]
            })
        );
    }

    #[test]
    fn test_report_keeps_wave_strictness() {
        let result = assemble_report(
            &raw(json!({"51205": [{"GMT": "2024-01-01T00:00:00Z", "height": "abc"}]})),
            &raw(json!({"KLIH1": []})),
            &Config::default(),
        );
        assert!(matches!(result, Err(BuoyError::InvalidNumber { .. })), "got {:?}", result);
    }

    #[test]
    fn test_report_rejects_wave_station_named_like_wind_key() {
        let result = assemble_report(
            &raw(json!({"kahului": []})),
            &raw(json!({"KLIH1": []})),
            &Config::default(),
        );
        assert!(matches!(result, Err(BuoyError::Parse(_))));
    }

    #[test]
    fn test_fetch_report_fetches_waves_and_wind() {
        let (base_url, server) = serve(
            vec![
                ("51101", 200, r#"[{"GMT": "2024-01-01T00:00:00Z", "height": "3", "period": "14"}]"#.to_string()),
                ("51205", 200, r#"{"data": []}"#.to_string()),
                ("KLIH1", 200, r#"[{"GMT": "2024-01-01T00:00:00Z", "windSpeed": "oops"}]"#.to_string()),
            ],
            3,
        );
        let mut config = Config::default();
        config.api.base_url = base_url;

        let report = fetch_report(&local_client(), &config, &["51101", "51205"]).expect("report");
        server.join().unwrap();

        assert_eq!(report.waves.names().collect::<Vec<_>>(), vec!["H2NorthWest", "Pauwela"]);
        assert_eq!(report.wind.readings.len(), 1);
        assert_eq!(report.wind.readings[0].wind_speed, None);
    }

    #[test]
    fn test_fetch_report_fails_when_wind_station_errors() {
        let (base_url, server) = serve(
            vec![
                ("51205", 200, "[]".to_string()),
                ("KLIH1", 503, "{}".to_string()),
            ],
            2,
        );
        let mut config = Config::default();
        config.api.base_url = base_url;

        let result = fetch_report(&local_client(), &config, &["51205"]);
        server.join().unwrap();

        assert!(matches!(result, Err(BuoyError::HttpError(503))), "got {:?}", result);
    }
}
