use crate::util::time::Timestamp;

pub const NOT_AVAILABLE: &str = "N/A";
pub const ACTIVE: &str = "Active";
pub const UNKNOWN: &str = "Unknown";

/// Display string for an optional timestamp; `fallback` is used when absent.
pub fn format_date_time(ts: Option<Timestamp>, fallback: &str) -> String {
    match ts {
        Some(ts) => ts.to_string(),
        None => fallback.to_string(),
    }
}

/// Human readable duration from a number of minutes.
///
/// Absent, negative and non-finite values render as `empty`. Positive values
/// under a minute render as `< 1m`; everything else as `{h}h {m}m`, with the
/// hour component dropped when zero.
pub fn format_duration(minutes: Option<f64>, empty: &str) -> String {
    let Some(minutes) = minutes else {
        return empty.to_string();
    };
    if !minutes.is_finite() || minutes < 0.0 {
        return empty.to_string();
    }
    if minutes > 0.0 && minutes < 1.0 {
        return "< 1m".to_string();
    }

    let total = minutes.round() as u64;
    let (hours, mins) = (total / 60, total % 60);
    if hours == 0 {
        format!("{mins}m")
    } else {
        format!("{hours}h {mins}m")
    }
}

/// `value` unless it is absent or blank, in which case `fallback`.
pub fn or_placeholder<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations() {
        assert_eq!(format_duration(Some(0.0), ""), "0m");
        assert_eq!(format_duration(Some(45.0), ""), "45m");
        assert_eq!(format_duration(Some(90.0), ""), "1h 30m");
        assert_eq!(format_duration(Some(0.5), ""), "< 1m");
        assert_eq!(format_duration(Some(600.0), ""), "10h 0m");
        assert_eq!(format_duration(Some(61.4), ""), "1h 1m");
    }

    #[test]
    fn rounded_minutes_carry_into_the_hour() {
        assert_eq!(format_duration(Some(59.6), ""), "1h 0m");
        assert_eq!(format_duration(Some(119.6), ""), "2h 0m");
        assert_eq!(format_duration(Some(59.4), ""), "59m");
    }

    #[test]
    fn duration_fallbacks_depend_on_call_site() {
        assert_eq!(format_duration(None, ""), "");
        assert_eq!(format_duration(None, NOT_AVAILABLE), "N/A");
        assert_eq!(format_duration(Some(-3.0), NOT_AVAILABLE), "N/A");
        assert_eq!(format_duration(Some(f64::NAN), ""), "");
    }

    #[test]
    fn date_time_fallbacks() {
        assert_eq!(format_date_time(None, ACTIVE), "Active");
        assert_eq!(format_date_time(None, NOT_AVAILABLE), "N/A");
        let ts = Timestamp::parse("2024-03-01T08:15:30");
        assert_eq!(format_date_time(ts, NOT_AVAILABLE), "2024-03-01 08:15:30");
    }

    #[test]
    fn placeholders() {
        assert_eq!(or_placeholder(None, NOT_AVAILABLE), "N/A");
        assert_eq!(or_placeholder(Some("  "), NOT_AVAILABLE), "N/A");
        assert_eq!(or_placeholder(Some("10.0.0.4"), NOT_AVAILABLE), "10.0.0.4");
    }
}
