/// Wave-station normalizer.
///
/// Turns a multi-station raw document into the per-buoy summary the
/// forecast reads: each station's readings in chronological order, trimmed,
/// keyed by display name and wrapped with its NW-swell reference metadata.
///
/// This path is strict. A reading with a present but non-numeric height or
/// period, or with no `GMT` string to order by, aborts the whole run.

use crate::coerce::{self, FieldRef, Strictness};
use crate::logging::{self, DataSource};
use crate::model::{BuoyError, RawDocument, RawMeasurement, WaveDocument, WaveReading, WaveStationSeries};
use crate::stations;

/// Readings kept per station when no count is configured.
pub const DEFAULT_WAVE_READINGS: usize = 15;

/// Normalizes every station in `doc`, keeping the earliest `num_readings`
/// readings of each.
///
/// Stations are processed in document order. Two ids sharing a display name
/// resolve to the later one.
pub fn normalize_waves(doc: &RawDocument, num_readings: usize) -> Result<WaveDocument, BuoyError> {
    let mut normalized = WaveDocument::new();

    for (station_id, measurements) in doc.stations()? {
        let series = normalize_station(&station_id, &measurements, num_readings)?;
        let name = stations::station_name(&station_id).to_string();

        logging::debug(
            DataSource::Waves,
            Some(&station_id),
            &format!("{} of {} readings kept as '{}'", series.time_series.len(), measurements.len(), name),
        );

        if normalized.insert(name.clone(), &series)?.is_some() {
            logging::warn(
                DataSource::Waves,
                Some(&station_id),
                &format!("display name '{}' already present, replacing earlier station", name),
            );
        }
    }

    Ok(normalized)
}

/// Sorts, trims and converts a single station's measurements.
pub fn normalize_station(
    station_id: &str,
    measurements: &[RawMeasurement],
    num_readings: usize,
) -> Result<WaveStationSeries, BuoyError> {
    let mut keyed = measurements
        .iter()
        .enumerate()
        .map(|(index, m)| {
            m.gmt_str()
                .map(|gmt| (gmt, m))
                .ok_or_else(|| BuoyError::MissingTimestamp {
                    station: station_id.to_string(),
                    index,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Lexical order on the raw string; sort_by is stable.
    keyed.sort_by(|a, b| a.0.cmp(b.0));
    keyed.truncate(num_readings);

    let time_series = keyed
        .into_iter()
        .map(|(gmt, m)| wave_reading(station_id, gmt, m))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(WaveStationSeries {
        arrival_order: stations::arrival_order(station_id),
        relative_hours: stations::relative_hours(station_id),
        time_series,
    })
}

fn wave_reading(station_id: &str, gmt: &str, m: &RawMeasurement) -> Result<WaveReading, BuoyError> {
    let height = FieldRef { station: station_id, field: "height" };
    let period = FieldRef { station: station_id, field: "period" };

    let timestamp_utc = match coerce::parse_timestamp(gmt) {
        Some(dt) => coerce::render_timestamp(dt),
        None => {
            logging::debug(
                DataSource::Waves,
                Some(station_id),
                &format!("unparsable GMT '{}' kept as-is", gmt),
            );
            gmt.to_string()
        }
    };

    Ok(WaveReading {
        timestamp_utc,
        wave_height_m: coerce::coerce_number(m.height.as_ref(), Strictness::Fatal, height)?,
        wave_period_s: coerce::coerce_number(m.period.as_ref(), Strictness::Fatal, period)?,
        swell_direction: m.swell_dir.clone(),
    })
}
