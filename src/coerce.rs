/// Field coercion shared by the wave and wind normalizers.
///
/// The surfbuoys API sends every reading as an untyped JSON value (numbers
/// usually arrive as strings). These helpers turn those values into the
/// typed fields of the normalized documents. The two paths differ only in
/// how they treat a malformed number, selected with [`Strictness`].

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde_json::Value;

use crate::model::BuoyError;

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

/// Formats tried, in order, after removing a trailing `Z`.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses an ISO 8601-like timestamp as a naive instant.
///
/// One trailing `Z` is stripped first; the result is not timezone-converted.
/// A bare date parses as midnight. Returns `None` for anything else,
/// including timestamps that carry an explicit UTC offset, unpadded fields
/// and leap seconds.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.strip_suffix('Z').unwrap_or(raw);
    if !has_fixed_width_shape(trimmed) {
        return None;
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        // chrono keeps second 60 as 59 s plus a second's worth of nanos
        .filter(|dt| dt.nanosecond() < 1_000_000_000)
}

/// `YYYY-MM-DD`, optionally followed by `[T| ]HH:MM[:SS[.f+]]`, every field
/// zero-padded. chrono alone accepts single-digit fields and signed years.
fn has_fixed_width_shape(s: &str) -> bool {
    let b = s.as_bytes();
    let digits = |range: std::ops::Range<usize>| {
        b.get(range).is_some_and(|d| d.iter().all(u8::is_ascii_digit))
    };

    if b.len() < 10 || !digits(0..4) || b[4] != b'-' || !digits(5..7) || b[7] != b'-' || !digits(8..10) {
        return false;
    }
    if b.len() == 10 {
        return true;
    }
    if b.len() < 16 || !matches!(b[10], b'T' | b' ') || !digits(11..13) || b[13] != b':' || !digits(14..16) {
        return false;
    }
    if b.len() == 16 {
        return true;
    }
    if b.len() < 19 || b[16] != b':' || !digits(17..19) {
        return false;
    }
    match b.len() {
        19 => true,
        len => b[19] == b'.' && len > 20 && digits(20..len),
    }
}

/// Renders an instant as `YYYY-MM-DDTHH:MM:SS[.ffffff]Z`.
///
/// Fractional seconds are written with microsecond precision, and only when
/// non-zero.
pub fn render_timestamp(dt: NaiveDateTime) -> String {
    let micros = dt.nanosecond() / 1_000;
    if micros == 0 {
        format!("{}Z", dt.format("%Y-%m-%dT%H:%M:%S"))
    } else {
        format!("{}.{:06}Z", dt.format("%Y-%m-%dT%H:%M:%S"), micros)
    }
}

/// Sort key for the lenient path: missing or unparsable timestamps sort
/// before every real instant.
pub fn timestamp_sort_key(raw: Option<&Value>) -> NaiveDateTime {
    raw.and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .and_then(parse_timestamp)
        .unwrap_or(NaiveDateTime::MIN)
}

// ---------------------------------------------------------------------------
// Numbers
// ---------------------------------------------------------------------------

/// What to do with a value that is present but not a finite number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// Abort with `BuoyError::InvalidNumber`.
    Fatal,
    /// Treat it as missing.
    Lenient,
}

/// Context attached to a fatal numeric error.
#[derive(Debug, Clone, Copy)]
pub struct FieldRef<'a> {
    pub station: &'a str,
    pub field: &'static str,
}

/// Whether a raw value counts as "present".
///
/// Null, `false`, zero, the empty string and empty containers are all
/// treated as missing readings.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn to_finite_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(true) => Some(1.0),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

/// Coerces a raw reading into a float.
///
/// Missing and falsy values become `Ok(None)`. A truthy value that is not a
/// finite number is an error under `Strictness::Fatal` and `Ok(None)` under
/// `Strictness::Lenient`.
pub fn coerce_number(
    value: Option<&Value>,
    strictness: Strictness,
    field: FieldRef<'_>,
) -> Result<Option<f64>, BuoyError> {
    let Some(value) = value.filter(|v| is_truthy(v)) else {
        return Ok(None);
    };

    match (to_finite_f64(value), strictness) {
        (Some(f), _) => Ok(Some(f)),
        (None, Strictness::Lenient) => Ok(None),
        (None, Strictness::Fatal) => Err(BuoyError::InvalidNumber {
            station: field.station.to_string(),
            field: field.field,
            value: value.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
