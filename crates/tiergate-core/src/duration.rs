//! Duration strings for timeouts: `<integer><unit>`, unit one of s/m/h/d/w.

use std::sync::LazyLock;

use regex::Regex;

static DURATION_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d+)([smhdw])$").ok());

/// Parse `text` into milliseconds. `None` for anything malformed or overflowing.
pub fn parse_duration_ms(text: &str) -> Option<u64> {
    let caps = DURATION_RE.as_ref()?.captures(text)?;
    let amount: u64 = caps.get(1)?.as_str().parse().ok()?;
    let unit_ms: u64 = match caps.get(2)?.as_str().to_ascii_lowercase().as_str() {
        "s" => 1_000,
        "m" => 60_000,
        "h" => 3_600_000,
        "d" => 86_400_000,
        "w" => 604_800_000,
        _ => return None,
    };
    amount.checked_mul(unit_ms)
}
