use std::path::Path;
use std::process::Command;

use chrono::NaiveDateTime;

use crate::date::CANONICAL_FORMAT;

/// Sentinel returned when a file's metadata cannot be probed. It sorts
/// before any real capture date, so one unreadable file never blocks
/// the earliest-wins aggregation; many unreadable files will drag the
/// archive date toward the epoch.
pub const EPOCH_FALLBACK: &str = "1970_01_01_00_00_00";

/// Fallback source for a file's creation timestamp when the name
/// carries none. Returns the tool's raw output, `None` on any failure.
pub trait MetadataProbe {
    fn modification_date(&self, path: &Path) -> Option<String>;
}

/// Spotlight adapter: `mdls -name kMDItemFSContentChangeDate -raw`.
/// One attempt per file, no timeout.
pub struct MdlsProbe;

impl MetadataProbe for MdlsProbe {
    fn modification_date(&self, path: &Path) -> Option<String> {
        let output = Command::new("mdls")
            .args(["-name", "kMDItemFSContentChangeDate", "-raw"])
            .arg(path)
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let raw = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if raw.is_empty() || raw == "(null)" {
            return None;
        }
        Some(raw)
    }
}

/// Probe one file, normalizing to the canonical six-group form. Never
/// fails: an unusable probe yields the epoch sentinel.
pub fn probe_date(probe: &dyn MetadataProbe, path: &Path) -> String {
    probe
        .modification_date(path)
        .as_deref()
        .and_then(normalize_probe_output)
        .unwrap_or_else(|| EPOCH_FALLBACK.to_string())
}

/// `mdls -raw` prints `2021-03-15 14:30:00 +0000`; the trailing zone
/// offset is dropped and the stamp regrouped canonically.
fn normalize_probe_output(raw: &str) -> Option<String> {
    let mut parts = raw.split_whitespace();
    let stamp = format!("{} {}", parts.next()?, parts.next()?);
    let dt = NaiveDateTime::parse_from_str(&stamp, "%Y-%m-%d %H:%M:%S").ok()?;
    Some(dt.format(CANONICAL_FORMAT).to_string())
}

#[cfg(test)]
pub(crate) struct FakeProbe {
    pub reply: Option<String>,
    pub calls: std::cell::Cell<usize>,
}

#[cfg(test)]
impl FakeProbe {
    pub fn new(reply: Option<&str>) -> Self {
        Self {
            reply: reply.map(str::to_string),
            calls: std::cell::Cell::new(0),
        }
    }
}

#[cfg(test)]
impl MetadataProbe for FakeProbe {
    fn modification_date(&self, _path: &Path) -> Option<String> {
        self.calls.set(self.calls.get() + 1);
        self.reply.clone()
    }
}
