pub mod filename;
pub mod probe;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;

use self::probe::MetadataProbe;

/// Format of the normalized six-group timestamp form.
pub const CANONICAL_FORMAT: &str = "%Y_%m_%d_%H_%M_%S";

/// Parse a normalized `YYYY_MM_DD_HH_MM_SS` string. Fields that do not
/// form a real calendar date/time are an error, never substituted.
pub fn parse_canonical(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, CANONICAL_FORMAT)
        .with_context(|| format!("invalid timestamp `{s}`"))
}

/// Resolve one file's creation timestamp: filename pattern first, the
/// metadata probe only as a fallback (never to cross-check). The probe
/// path cannot fail; a matched filename run with impossible calendar
/// fields aborts the run.
pub fn resolve_date(
    probe: &dyn MetadataProbe,
    path: &Path,
    filename: &str,
) -> Result<NaiveDateTime> {
    let stamp = match filename::extract_timestamp(filename) {
        Some(s) => s,
        None => probe::probe_date(probe, path),
    };
    parse_canonical(&stamp).with_context(|| format!("resolving date for {filename}"))
}

/// Earliest of the per-clip dates; `None` for an empty set, which the
/// caller maps to its wall-clock policy.
pub fn earliest_date(dates: &[NaiveDateTime]) -> Option<NaiveDateTime> {
    dates.iter().min().copied()
}
