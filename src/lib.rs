//! surfbuoy_service: fetch Hawaiian surf buoy readings and publish them as
//! normalized JSON for the daily surf report.
//!
//! Modules:
//! - `model`     — raw and normalized document types, `BuoyError`
//! - `stations`  — compiled-in buoy registry and reference metadata
//! - `coerce`    — timestamp and numeric field coercion
//! - `normalize` — wave and wind transforms, file-level entry points
//! - `ingest`    — surfbuoys API client
//! - `report`    — one-shot fetch + normalize of waves and wind together
//! - `verify`    — live station availability report
//! - `config`    — TOML / `.env` configuration
//! - `logging`   — source-tagged console and file logging

pub mod coerce;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod report;
pub mod stations;
pub mod verify;
