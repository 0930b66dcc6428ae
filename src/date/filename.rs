use regex::Regex;
use std::sync::LazyLock;

// Six digit groups (4,2,2,2,2,2), each gap bridged by at most one of
// `.`, `_`, space or `-`. The guards reject runs embedded in longer
// digit sequences; rust's regex has no lookarounds.
static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:^|[^0-9])(?P<stamp>\d{4}[._ -]?\d{2}[._ -]?\d{2}[._ -]?\d{2}[._ -]?\d{2}[._ -]?\d{2})(?:[^0-9]|$)",
    )
    .unwrap()
});

/// Find the first `YYYY MM DD HH MM SS` digit run in a file name and
/// return it in the canonical underscore form. `None` means the name
/// simply carries no timestamp, which is an expected outcome.
///
/// Calendar validity is not checked here; a matched run with, say,
/// month 13 fails later at canonical parsing.
pub fn extract_timestamp(name: &str) -> Option<String> {
    let caps = TIMESTAMP_RE.captures(name)?;
    Some(to_canonical_form(caps.name("stamp")?.as_str()))
}

/// Strip separators from a matched run and regroup the 14 digits as
/// `YYYY_MM_DD_HH_MM_SS`.
fn to_canonical_form(run: &str) -> String {
    let digits: String = run.chars().filter(|c| c.is_ascii_digit()).collect();
    format!(
        "{}_{}_{}_{}_{}_{}",
        &digits[0..4],
        &digits[4..6],
        &digits[6..8],
        &digits[8..10],
        &digits[10..12],
        &digits[12..14]
    )
}
