//! Duration argument parsing.

use std::time::Duration;

/// Parses `500ms`, `30s`, `2m`, `1h`, or a bare number of seconds.
pub fn parse_duration(raw: &str) -> Result<Duration, String> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);

    let value: u64 = digits
        .parse()
        .map_err(|_| format!("invalid duration {raw:?}: expected a number with optional unit"))?;

    let duration = match unit.trim() {
        "" | "s" | "sec" | "secs" => Duration::from_secs(value),
        "ms" => Duration::from_millis(value),
        "m" | "min" | "mins" => Duration::from_secs(value.saturating_mul(60)),
        "h" => Duration::from_secs(value.saturating_mul(3600)),
        other => return Err(format!("invalid duration unit {other:?} in {raw:?}")),
    };

    if duration.is_zero() {
        return Err("duration must be greater than zero".to_string());
    }

    Ok(duration)
}
