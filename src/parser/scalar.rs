//! Scalar coercion for raw document text.

use crate::config::ZERO_DURATION;

/// Parse a locale-tolerant decimal, returning `None` when nothing usable remains.
///
/// Commas are read as decimal separators, then every character other than
/// digits, periods and minus signs is dropped (units, currency symbols,
/// whitespace).
pub fn try_parse_decimal(text: &str) -> Option<f64> {
    let cleaned: String = text
        .replace(',', ".")
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a locale-tolerant decimal with a fallback.
pub fn parse_decimal(text: &str, default: f64) -> f64 {
    try_parse_decimal(text).unwrap_or(default)
}

/// Normalize a duration to `HH:MM:SS`, dropping sub-second precision.
///
/// Anything that is not three numeric `:`-separated components becomes
/// [`ZERO_DURATION`].
pub fn normalize_duration(text: Option<&str>) -> String {
    let whole = text
        .map(str::trim)
        .and_then(|t| t.split('.').next())
        .unwrap_or_default();

    let components: Vec<&str> = whole.split(':').collect();
    let well_formed = components.len() == 3
        && components
            .iter()
            .all(|c| !c.is_empty() && c.chars().all(|ch| ch.is_ascii_digit()));

    if well_formed {
        whole.to_string()
    } else {
        ZERO_DURATION.to_string()
    }
}

/// Convert a `HH:MM:SS[.fff]` duration to fractional hours.
pub fn duration_to_hours(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() || text == ZERO_DURATION {
        return 0.0;
    }

    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() < 3 {
        return 0.0;
    }

    let seconds = parts[2].split('.').next().unwrap_or("");
    match (
        parts[0].trim().parse::<f64>(),
        parts[1].trim().parse::<f64>(),
        seconds.trim().parse::<f64>(),
    ) {
        (Ok(h), Ok(m), Ok(s)) => h + m / 60.0 + s / 3600.0,
        _ => 0.0,
    }
}
