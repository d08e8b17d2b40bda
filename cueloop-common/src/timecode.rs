//! Subtitle timecode parsing and display formatting
//!
//! Cue timestamps arrive as SRT strings (`HH:MM:SS,mmm`) and are converted to
//! seconds on a numeric timeline. Parsing never fails: an empty string is the
//! start of the timeline, and a malformed field turns the whole value into
//! `NaN`, which downstream lookups simply never match.

/// Parse an SRT timecode (`HH:MM:SS,mmm`) into seconds.
///
/// - Empty (or whitespace-only) input yields `0.0`.
/// - No bounds validation is applied (`00:99:00,000` is 5940 seconds).
/// - Any missing or non-numeric field yields `f64::NAN`.
///
/// # Examples
///
/// ```
/// use cueloop_common::timecode::parse_timecode;
///
/// assert_eq!(parse_timecode("00:01:02,500"), 62.5);
/// assert_eq!(parse_timecode(""), 0.0);
/// assert!(parse_timecode("00:xx:02,500").is_nan());
/// ```
pub fn parse_timecode(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }

    let mut parts = text.split(':');
    let hours = parse_field(parts.next());
    let minutes = parse_field(parts.next());

    // Seconds and milliseconds share the last field, separated by a comma
    let (seconds, millis) = match parts.next() {
        Some(last) => {
            let mut sub = last.split(',');
            (parse_field(sub.next()), parse_field(sub.next()))
        }
        None => (f64::NAN, f64::NAN),
    };

    hours * 3600.0 + minutes * 60.0 + seconds + millis / 1000.0
}

/// Integer field of a timecode; absent or malformed fields become `NaN`.
fn parse_field(field: Option<&str>) -> f64 {
    field
        .and_then(|f| f.trim().parse::<i64>().ok())
        .map(|v| v as f64)
        .unwrap_or(f64::NAN)
}

/// Format seconds back into an SRT timecode (`HH:MM:SS,mmm`).
///
/// Non-finite or negative values render as `00:00:00,000`.
///
/// # Examples
///
/// ```
/// use cueloop_common::timecode::format_timecode;
///
/// assert_eq!(format_timecode(62.5), "00:01:02,500");
/// assert_eq!(format_timecode(3723.004), "01:02:03,004");
/// ```
pub fn format_timecode(seconds: f64) -> String {
    let total_ms = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    };

    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

/// Format seconds as a compact clock (`M:SS.s`) for log lines.
///
/// # Examples
///
/// ```
/// use cueloop_common::timecode::format_clock;
///
/// assert_eq!(format_clock(2.1), "0:02.1");
/// assert_eq!(format_clock(330.0), "5:30.0");
/// ```
pub fn format_clock(seconds: f64) -> String {
    if !seconds.is_finite() {
        return "-:--.-".to_string();
    }

    let is_negative = seconds < 0.0;
    let tenths = (seconds.abs() * 10.0).round() as u64;
    let minutes = tenths / 600;
    let rem = tenths % 600;
    let formatted = format!("{}:{:02}.{}", minutes, rem / 10, rem % 10);

    if is_negative {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_timecode() {
        assert_eq!(parse_timecode("00:01:02,500"), 62.5);
        assert_eq!(parse_timecode("01:00:00,000"), 3600.0);
        assert_eq!(parse_timecode("00:00:00,100"), 0.1);
    }

    #[test]
    fn test_parse_empty_is_zero() {
        assert_eq!(parse_timecode(""), 0.0);
        assert_eq!(parse_timecode("   "), 0.0);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(parse_timecode(" 00:00:03,000 "), 3.0);
    }

    #[test]
    fn test_parse_no_bounds_validation() {
        // Minutes beyond 59 are accepted as-is
        assert_eq!(parse_timecode("00:99:00,000"), 5940.0);
    }

    #[test]
    fn test_parse_malformed_degrades_to_nan() {
        assert!(parse_timecode("00:aa:02,500").is_nan());
        assert!(parse_timecode("00:01:02").is_nan()); // missing millis
        assert!(parse_timecode("00:01").is_nan()); // missing seconds
        assert!(parse_timecode("00:00:01.500").is_nan()); // wrong separator
        assert!(parse_timecode("garbage").is_nan());
    }

    #[test]
    fn test_parse_short_millis_field() {
        // The millisecond field is an integer count, not a decimal fraction
        assert!((parse_timecode("00:00:01,5") - 1.005).abs() < 1e-9);
    }

    #[test]
    fn test_format_timecode() {
        assert_eq!(format_timecode(0.0), "00:00:00,000");
        assert_eq!(format_timecode(62.5), "00:01:02,500");
        assert_eq!(format_timecode(f64::NAN), "00:00:00,000");
        assert_eq!(format_timecode(-4.0), "00:00:00,000");
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "0:00.0");
        assert_eq!(format_clock(59.96), "1:00.0");
        assert_eq!(format_clock(-1.5), "-0:01.5");
        assert_eq!(format_clock(f64::INFINITY), "-:--.-");
    }
}
