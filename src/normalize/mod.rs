/// Raw-to-normalized document transforms.
///
/// Submodules:
/// - `waves` — multi-station wave buoy summary (strict).
/// - `wind`  — single-station wind summary for Kahului (lenient).
///
/// The file-level entry points here do one blocking read, one in-memory
/// transform and one blocking write. Output is fully serialized and written
/// to a temporary file before the destination is replaced, so a failed run
/// never leaves a partial file.

pub mod waves;
pub mod wind;

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::logging::{self, DataSource};
use crate::model::{BuoyError, RawDocument, WaveDocument, WindDocument};

/// Reads and parses a raw station document from disk.
pub fn read_raw_document(path: &Path) -> Result<RawDocument, BuoyError> {
    let text = fs::read_to_string(path).map_err(|e| {
        BuoyError::Io(std::io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))
    })?;
    RawDocument::from_json(&text)
}

/// Serializes `value` as 2-space indented JSON and overwrites `path`.
///
/// The text goes to a temporary file in the same directory which is then
/// renamed over `path`, so readers see either the old file or the new one.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), BuoyError> {
    let text = serde_json::to_string_pretty(value)?;

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(text.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Wave normalizer over files.
pub fn transform_wave_file(
    input: &Path,
    output: &Path,
    num_readings: usize,
) -> Result<WaveDocument, BuoyError> {
    let raw = read_raw_document(input)?;
    let normalized = waves::normalize_waves(&raw, num_readings)?;
    write_json(output, &normalized)?;

    logging::info(
        DataSource::Waves,
        None,
        &format!(
            "{} station(s) from {} written to {}",
            normalized.len(),
            input.display(),
            output.display()
        ),
    );
    Ok(normalized)
}

/// Wind normalizer over files.
pub fn transform_wind_file(
    input: &Path,
    output: &Path,
    station_id: &str,
    num_readings: usize,
) -> Result<WindDocument, BuoyError> {
    let raw = read_raw_document(input)?;
    let normalized = wind::normalize_wind(&raw, station_id, num_readings)?;
    write_json(output, &normalized)?;

    logging::info(
        DataSource::Wind,
        Some(station_id),
        &format!(
            "{} reading(s) written to {} under '{}'",
            normalized.readings.len(),
            output.display(),
            normalized.display_name
        ),
    );
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_write_json_replaces_file_and_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        fs::write(&path, "old contents").unwrap();

        write_json(&path, &json!({"kahului": []})).expect("write should succeed");

        assert_eq!(fs::read_to_string(&path).unwrap(), "{\n  \"kahului\": []\n}");
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1, "temporary file should be renamed away");
    }

    #[test]
    fn test_write_json_to_missing_directory_leaves_target_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no_such_dir").join("out.json");

        let result = write_json(&path, &json!({"kahului": []}));

        assert!(matches!(result, Err(BuoyError::Io(_))), "got {:?}", result);
        assert!(!path.exists());
    }
}
