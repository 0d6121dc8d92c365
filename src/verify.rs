//! Station Verification Module
//!
//! Probes every configured buoy against the live surfbuoys API to find out
//! which stations are currently served and returning readings. Unlike the
//! fetch path, a failing station here is recorded and the run continues.
//!
//! Use this before adding a buoy to the registry, or when a fetch run
//! starts failing, to see which station is at fault.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::ingest::surfbuoys;
use crate::logging::{self, DataSource};
use crate::model::BuoyError;
use crate::stations::{STATION_REGISTRY, WIND_STATION_NAME};

// ============================================================================
// Verification Results
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub timestamp: String,
    pub results: Vec<StationVerification>,
    pub summary: VerificationSummary,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationSummary {
    pub total: usize,
    pub working: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationVerification {
    pub station_id: String,
    pub name: String,
    pub status: VerificationStatus,
    pub api_responsive: bool,
    pub sample_data_count: usize,
    /// Latest `GMT` string seen, by the same lexical order the wave path uses.
    pub latest_reading: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum VerificationStatus {
    Success,
    /// The API answered but had no readings for the station.
    PartialSuccess,
    Failed,
}

// ============================================================================
// Single Station
// ============================================================================

pub fn verify_station(
    client: &reqwest::blocking::Client,
    base_url: &str,
    station_id: &str,
    name: &str,
) -> StationVerification {
    let outcome = surfbuoys::fetch_station(client, base_url, station_id);
    summarize_outcome(station_id, name, outcome)
}

/// Turns a fetch outcome into a verification record.
pub fn summarize_outcome(
    station_id: &str,
    name: &str,
    outcome: Result<serde_json::Value, BuoyError>,
) -> StationVerification {
    let mut result = StationVerification {
        station_id: station_id.to_string(),
        name: name.to_string(),
        status: VerificationStatus::Failed,
        api_responsive: false,
        sample_data_count: 0,
        latest_reading: None,
        error_message: None,
    };

    match outcome {
        Ok(readings) => {
            result.api_responsive = true;
            let readings = readings.as_array().map(Vec::as_slice).unwrap_or_default();
            result.sample_data_count = readings.len();
            result.latest_reading = readings
                .iter()
                .filter_map(|r| r.get("GMT").and_then(|g| g.as_str()))
                .max()
                .map(str::to_string);

            result.status = if result.sample_data_count > 0 {
                VerificationStatus::Success
            } else {
                VerificationStatus::PartialSuccess
            };
        }
        Err(e) => {
            logging::log_fetch_failure(station_id, "verify", &e);
            result.error_message = Some(e.to_string());
        }
    }

    result
}

// ============================================================================
// Full Verification Runner
// ============================================================================

pub fn run_full_verification(config: &Config) -> Result<VerificationReport, BuoyError> {
    let client = surfbuoys::build_client()?;
    let base_url = config.api.base_url.as_str();

    let mut targets: Vec<(&str, &str)> = STATION_REGISTRY
        .iter()
        .map(|s| (s.station_id, s.name))
        .collect();
    targets.push((config.wind.station_id.as_str(), WIND_STATION_NAME));

    let mut report = VerificationReport {
        timestamp: Utc::now().to_rfc3339(),
        results: Vec::with_capacity(targets.len()),
        summary: VerificationSummary {
            total: targets.len(),
            ..Default::default()
        },
    };

    println!("🔍 Verifying surfbuoys stations...");
    for (station_id, name) in targets {
        print!("  {} ({}) ... ", name, station_id);
        let result = verify_station(&client, base_url, station_id, name);

        match result.status {
            VerificationStatus::Success => {
                println!(
                    "✓ OK ({} readings, latest {})",
                    result.sample_data_count,
                    result.latest_reading.as_deref().unwrap_or("?")
                );
                report.summary.working += 1;
            }
            VerificationStatus::PartialSuccess => {
                println!("⚠ Responsive but no readings");
                report.summary.working += 1;
            }
            VerificationStatus::Failed => {
                println!("✗ FAILED: {}", result.error_message.as_deref().unwrap_or("Unknown"));
                report.summary.failed += 1;
            }
        }

        report.results.push(result);
    }

    logging::log_run_summary(
        DataSource::Api,
        "Verification",
        report.summary.total,
        report.summary.working,
        report.summary.failed,
    );

    Ok(report)
}

pub fn print_summary(report: &VerificationReport) {
    println!("\n═══════════════════════════════════════════════════════════");
    println!("📊 VERIFICATION SUMMARY");
    println!("═══════════════════════════════════════════════════════════");
    println!();
    println!(
        "Stations:    {}/{} working  ({} failed)",
        report.summary.working, report.summary.total, report.summary.failed
    );

    let success_rate = if report.summary.total > 0 {
        (report.summary.working as f64 / report.summary.total as f64) * 100.0
    } else {
        0.0
    };

    println!("Success Rate: {:.1}%", success_rate);
    println!("═══════════════════════════════════════════════════════════");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_readings_mark_station_working() {
        let readings = json!([
            {"GMT": "2024-01-01T01:00:00Z"},
            {"GMT": "2024-01-01T03:00:00Z"},
            {"GMT": "2024-01-01T02:00:00Z"}
        ]);
        let result = summarize_outcome("51205", "Pauwela", Ok(readings));
        assert_eq!(result.status, VerificationStatus::Success);
        assert_eq!(result.sample_data_count, 3);
        assert_eq!(result.latest_reading.as_deref(), Some("2024-01-01T03:00:00Z"));
        assert!(result.error_message.is_none());
    }

    #[test]
    fn test_empty_response_is_partial_success() {
        let result = summarize_outcome("51213", "Kaumalapau", Ok(json!([])));
        assert_eq!(result.status, VerificationStatus::PartialSuccess);
        assert!(result.api_responsive);
        assert!(result.latest_reading.is_none());
    }

    #[test]
    fn test_http_error_is_failure_with_message() {
        let result = summarize_outcome("51002", "Hilo", Err(BuoyError::HttpError(404)));
        assert_eq!(result.status, VerificationStatus::Failed);
        assert!(!result.api_responsive);
        assert_eq!(result.error_message.as_deref(), Some("HTTP error: 404"));
    }
}
