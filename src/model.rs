/// Core data types for the surf buoy normalization service.
///
/// This module defines the shared domain model imported by all other modules:
/// the raw per-station documents served by the surfbuoys API, the normalized
/// documents we write back out, and the crate-wide error type.
/// It contains no I/O, only types and the small amount of glue needed to
/// serialize them in the published shape.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Raw (API) types
// ---------------------------------------------------------------------------

/// A single observation for one station at one instant, as served by
/// `api.surfbuoys.com`.
///
/// Every field is untrusted: the API sends numbers as strings, sometimes as
/// empty strings, and occasionally omits fields entirely. Values are kept as
/// raw JSON and interpreted by `coerce` according to each path's policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawMeasurement {
    #[serde(rename = "GMT", skip_serializing_if = "Option::is_none")]
    pub gmt: Option<Value>, // ISO 8601-ish, e.g. "2024-01-02T00:00:00Z"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Value>, // metres
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Value>, // seconds
    #[serde(rename = "swellDir", skip_serializing_if = "Option::is_none")]
    pub swell_dir: Option<Value>, // compass point, e.g. "NW"
    #[serde(rename = "windSpeed", skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<Value>,
    #[serde(rename = "windDir", skip_serializing_if = "Option::is_none")]
    pub wind_dir: Option<Value>,
    #[serde(rename = "windGust", skip_serializing_if = "Option::is_none")]
    pub wind_gust: Option<Value>,
}

impl RawMeasurement {
    /// The `GMT` field, if it is present and a JSON string.
    pub fn gmt_str(&self) -> Option<&str> {
        self.gmt.as_ref().and_then(Value::as_str)
    }
}

/// A raw multi-station document: station id → measurements, in whatever
/// order the API returned them.
///
/// Stations are kept as raw JSON until asked for so that a malformed entry
/// for a station nobody reads (e.g. the wind path only reads `KLIH1`) does
/// not abort the run. Key order follows the input document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawDocument {
    entries: Map<String, Value>,
}

impl RawDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a raw document from JSON text. The top level must be an object.
    pub fn from_json(text: &str) -> Result<Self, BuoyError> {
        let value: Value = serde_json::from_str(text)?;
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            other => Err(BuoyError::Parse(format!(
                "expected a top-level object keyed by station id, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Adds (or replaces) one station's raw measurement array.
    pub fn insert(&mut self, station_id: &str, measurements: Value) {
        self.entries.insert(station_id.to_string(), measurements);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn station_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Decodes one station's measurements. `Ok(None)` when the station is
    /// absent; an error when it is present but not an array of objects.
    pub fn station(&self, station_id: &str) -> Result<Option<Vec<RawMeasurement>>, BuoyError> {
        self.entries
            .get(station_id)
            .map(|value| decode_measurements(station_id, value))
            .transpose()
    }

    /// Decodes every station, in document order.
    pub fn stations(&self) -> Result<Vec<(String, Vec<RawMeasurement>)>, BuoyError> {
        self.entries
            .iter()
            .map(|(id, value)| Ok((id.clone(), decode_measurements(id, value)?)))
            .collect()
    }
}

fn decode_measurements(station_id: &str, value: &Value) -> Result<Vec<RawMeasurement>, BuoyError> {
    Vec::<RawMeasurement>::deserialize(value).map_err(|e| {
        BuoyError::Parse(format!("station {}: {}", station_id, e))
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Station metadata values
// ---------------------------------------------------------------------------

/// Approximate swell propagation delay from the Pauwela reference buoy.
///
/// Serializes as a bare integer, or as the string `"NA"` when no established
/// relationship exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeHours {
    Hours(i64),
    NotApplicable,
}

/// The sentinel written for `RelativeHours::NotApplicable`.
pub const NOT_APPLICABLE: &str = "NA";

impl Serialize for RelativeHours {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RelativeHours::Hours(h) => serializer.serialize_i64(*h),
            RelativeHours::NotApplicable => serializer.serialize_str(NOT_APPLICABLE),
        }
    }
}

// ---------------------------------------------------------------------------
// Normalized wave output
// ---------------------------------------------------------------------------

/// One normalized wave reading. Field order is the published order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveReading {
    #[serde(rename = "timestampUTC")]
    pub timestamp_utc: String,
    #[serde(rename = "waveHeight_m")]
    pub wave_height_m: Option<f64>,
    #[serde(rename = "wavePeriod_s")]
    pub wave_period_s: Option<f64>,
    #[serde(rename = "swellDirection")]
    pub swell_direction: Option<Value>,
}

/// A station's metadata wrapper around its trimmed time series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveStationSeries {
    #[serde(rename = "arrivalOrder_NW_swell")]
    pub arrival_order: Option<u32>,
    #[serde(rename = "relativeHoursFromPauwela")]
    pub relative_hours: RelativeHours,
    #[serde(rename = "timeSeries")]
    pub time_series: Vec<WaveReading>,
}

/// The normalized wave document: display name → station series.
///
/// Backed by a `serde_json` map, so keys serialize in insertion order and
/// re-inserting a display name replaces the value at its first position
/// (last write wins).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WaveDocument {
    stations: Map<String, Value>,
}

impl WaveDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a station, returning the value it replaced, if any.
    pub fn insert(
        &mut self,
        name: String,
        series: &WaveStationSeries,
    ) -> Result<Option<Value>, BuoyError> {
        let value = serde_json::to_value(series)?;
        Ok(self.stations.insert(name, value))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.stations.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.stations.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Normalized wind output
// ---------------------------------------------------------------------------

/// One normalized wind reading. `timestamp_utc` is the raw `GMT` value,
/// passed through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindReading {
    #[serde(rename = "timestampUTC")]
    pub timestamp_utc: Option<Value>,
    #[serde(rename = "windDirection")]
    pub wind_direction: Option<Value>,
    #[serde(rename = "windSpeed")]
    pub wind_speed: Option<f64>,
    #[serde(rename = "windGust")]
    pub wind_gust: Option<f64>,
}

/// The normalized wind document: a single display key wrapping the readings,
/// e.g. `{ "kahului": [...] }`.
#[derive(Debug, Clone, PartialEq)]
pub struct WindDocument {
    pub display_name: String,
    pub readings: Vec<WindReading>,
}

impl Serialize for WindDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.display_name, &self.readings)?;
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching, loading or normalizing buoy data.
#[derive(Debug)]
pub enum BuoyError {
    /// Reading or writing a local file failed.
    Io(std::io::Error),
    /// A document could not be parsed or had the wrong shape.
    Parse(String),
    /// Non-2xx HTTP response from the surfbuoys API.
    HttpError(u16),
    /// The request itself failed (DNS, connect, timeout, body read).
    Request(String),
    /// A wave reading carried a value that is present but not a number.
    InvalidNumber {
        station: String,
        field: &'static str,
        value: String,
    },
    /// A wave reading had no usable `GMT` string to sort by.
    MissingTimestamp { station: String, index: usize },
    /// The configuration file or a command-line override was invalid.
    Config(String),
}

impl std::fmt::Display for BuoyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuoyError::Io(e) => write!(f, "I/O error: {}", e),
            BuoyError::Parse(msg) => write!(f, "Parse error: {}", msg),
            BuoyError::HttpError(code) => write!(f, "HTTP error: {}", code),
            BuoyError::Request(msg) => write!(f, "Request failed: {}", msg),
            BuoyError::InvalidNumber { station, field, value } => {
                write!(f, "Invalid number for station {} field {}: {}", station, field, value)
            }
            BuoyError::MissingTimestamp { station, index } => {
                write!(f, "Missing GMT timestamp for station {} at measurement {}", station, index)
            }
            BuoyError::Config(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for BuoyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuoyError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BuoyError {
    fn from(e: std::io::Error) -> Self {
        BuoyError::Io(e)
    }
}

impl From<serde_json::Error> for BuoyError {
    fn from(e: serde_json::Error) -> Self {
        BuoyError::Parse(e.to_string())
    }
}

impl From<toml::de::Error> for BuoyError {
    fn from(e: toml::de::Error) -> Self {
        BuoyError::Config(e.to_string())
    }
}

impl From<reqwest::Error> for BuoyError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => BuoyError::HttpError(status.as_u16()),
            None => BuoyError::Request(e.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_document_rejects_non_object_top_level() {
        let result = RawDocument::from_json("[1, 2, 3]");
        assert!(
            matches!(result, Err(BuoyError::Parse(_))),
            "an array at the top level should be a parse error, got {:?}",
            result
        );
    }

    #[test]
    fn test_raw_document_rejects_invalid_json() {
        assert!(RawDocument::from_json("{ not json").is_err());
    }

    #[test]
    fn test_raw_document_keeps_input_station_order() {
        let doc = RawDocument::from_json(r#"{"51208": [], "51101": [], "51205": []}"#)
            .expect("valid document");
        let ids: Vec<_> = doc.station_ids().collect();
        assert_eq!(ids, vec!["51208", "51101", "51205"]);
    }

    #[test]
    fn test_station_lookup_missing_is_none() {
        let doc = RawDocument::from_json(r#"{"51205": []}"#).unwrap();
        assert!(doc.station("KLIH1").unwrap().is_none());
    }

    #[test]
    fn test_station_with_non_array_value_is_parse_error() {
        let doc = RawDocument::from_json(r#"{"51205": "offline"}"#).unwrap();
        let err = doc.station("51205").unwrap_err();
        assert!(err.to_string().contains("51205"), "error should name the station: {}", err);
    }

    #[test]
    fn test_raw_measurement_ignores_unknown_fields_and_nulls() {
        let doc = RawDocument::from_json(
            r#"{"KLIH1": [{"GMT": "2024-01-01T00:00:00Z", "windSpeed": null, "airTemp": "24"}]}"#,
        )
        .unwrap();
        let measurements = doc.station("KLIH1").unwrap().unwrap();
        assert_eq!(measurements.len(), 1);
        assert_eq!(measurements[0].gmt_str(), Some("2024-01-01T00:00:00Z"));
        assert_eq!(measurements[0].wind_speed, None);
    }

    #[test]
    fn test_relative_hours_serializes_as_number_or_na() {
        assert_eq!(serde_json::to_value(RelativeHours::Hours(12)).unwrap(), json!(12));
        assert_eq!(serde_json::to_value(RelativeHours::NotApplicable).unwrap(), json!("NA"));
    }

    #[test]
    fn test_wave_document_insert_replaces_in_place() {
        let series = |order| WaveStationSeries {
            arrival_order: Some(order),
            relative_hours: RelativeHours::NotApplicable,
            time_series: vec![],
        };
        let mut doc = WaveDocument::new();
        assert!(doc.insert("Pauwela".into(), &series(1)).unwrap().is_none());
        assert!(doc.insert("Hanalei".into(), &series(2)).unwrap().is_none());
        let replaced = doc.insert("Pauwela".into(), &series(9)).unwrap();

        assert_eq!(replaced.map(|v| v["arrivalOrder_NW_swell"].clone()), Some(json!(1)));
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.names().collect::<Vec<_>>(), vec!["Pauwela", "Hanalei"]);
        assert_eq!(doc.get("Pauwela").unwrap()["arrivalOrder_NW_swell"], json!(9));
        assert_eq!(
            serde_json::to_string(&doc).unwrap(),
            r#"{"Pauwela":{"arrivalOrder_NW_swell":9,"relativeHoursFromPauwela":"NA","timeSeries":[]},"Hanalei":{"arrivalOrder_NW_swell":2,"relativeHoursFromPauwela":"NA","timeSeries":[]}}"#
        );
    }

    #[test]
    fn test_wind_document_serializes_under_display_key() {
        let doc = WindDocument {
            display_name: "kahului".to_string(),
            readings: vec![WindReading {
                timestamp_utc: Some(json!("2024-01-01T00:00:00Z")),
                wind_direction: Some(json!("ENE")),
                wind_speed: Some(12.5),
                wind_gust: None,
            }],
        };
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({"kahului": [{
                "timestampUTC": "2024-01-01T00:00:00Z",
                "windDirection": "ENE",
                "windSpeed": 12.5,
                "windGust": null
            }]})
        );
    }

    #[test]
    fn test_error_display_messages() {
        assert_eq!(BuoyError::HttpError(503).to_string(), "HTTP error: 503");
        let err = BuoyError::InvalidNumber {
            station: "51205".into(),
            field: "height",
            value: "\"abc\"".into(),
        };
        assert_eq!(err.to_string(), "Invalid number for station 51205 field height: \"abc\"");
    }
}
