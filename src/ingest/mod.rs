/// Data ingestion from external buoy APIs.
///
/// Submodules:
/// - `surfbuoys` — blocking client for `api.surfbuoys.com` station readings.

pub mod surfbuoys;

#[cfg(test)]
pub(crate) mod stub;
