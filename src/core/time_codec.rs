//! Time quantization and `MM:SS.hh` formatting.
//!
//! The system resolves time to 10 ms. Values are quantized before any
//! statistic is computed, not only when they are displayed.

use crate::domain::model::Millis;

/// Declared timing resolution in milliseconds.
pub const RESOLUTION_MS: f64 = 10.0;

// 解析結果需能以 i64 毫秒表示
const MAX_HUNDREDTHS: f64 = (Millis::MAX / 10) as f64;

/// Rounds to the nearest multiple of 10 ms, ties away from zero.
///
/// Non-finite input saturates the way `f64 as i64` does (NaN becomes 0);
/// callers that care check `is_finite` first.
pub fn quantize(ms: f64) -> Millis {
    ((ms / RESOLUTION_MS).round() * RESOLUTION_MS) as Millis
}

/// Renders a duration as `MM:SS.hh`, or `-` when the value is not finite.
pub fn format_time(ms: f64) -> String {
    if !ms.is_finite() {
        return "-".to_string();
    }

    let q = quantize(ms);
    let sign = if q < 0 { "-" } else { "" };
    let q = q.unsigned_abs();

    let total_seconds = q / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    let hundredths = (q % 1000) / 10;
    format!("{}{:02}:{:02}.{:02}", sign, minutes, seconds, hundredths)
}

pub fn format_millis(ms: Millis) -> String {
    format_time(ms as f64)
}

/// `-` for a missing value, otherwise [`format_time`].
pub fn format_option(ms: Option<f64>) -> String {
    ms.map_or_else(|| "-".to_string(), format_time)
}

/// Parses decimal seconds (`"12.34"`) or the clock form produced by
/// [`format_time`] (`"01:02.34"`) into milliseconds at 10 ms resolution.
///
/// Returns `None` for anything that is not a finite, non-negative time.
pub fn parse_seconds(text: &str) -> Option<Millis> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let seconds = match text.rsplit_once(':') {
        Some((minutes, rest)) => {
            let minutes: u64 = minutes.parse().ok()?;
            let secs: f64 = rest.parse().ok()?;
            if !(0.0..60.0).contains(&secs) {
                return None;
            }
            minutes as f64 * 60.0 + secs
        }
        None => text.parse::<f64>().ok()?,
    };

    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    let hundredths = (seconds * 100.0).round();
    if hundredths >= MAX_HUNDREDTHS {
        return None;
    }
    (hundredths as Millis).checked_mul(10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_rounds_to_hundredths() {
        assert_eq!(quantize(1234.0), 1230);
        assert_eq!(quantize(1235.0), 1240);
        assert_eq!(quantize(1239.9), 1240);
        assert_eq!(quantize(4.9), 0);
        assert_eq!(quantize(5.0), 10);
        assert_eq!(quantize(-5.0), -10);
    }

    #[test]
    fn test_quantize_is_idempotent() {
        for raw in [0.0, 4.99, 5.0, 1234.5, 98_765.4321, 3_600_000.7, -15.0] {
            let once = quantize(raw);
            assert_eq!(quantize(once as f64), once, "raw = {}", raw);
        }
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "00:00.00");
        assert_eq!(format_time(12_345.0), "00:12.35");
        assert_eq!(format_time(61_000.0), "01:01.00");
        assert_eq!(format_time(59_999.0), "01:00.00");
        assert_eq!(format_time(6_000_000.0), "100:00.00");
        assert_eq!(format_time(-1_230.0), "-00:01.23");
    }

    #[test]
    fn test_format_non_finite_is_dash() {
        assert_eq!(format_time(f64::NAN), "-");
        assert_eq!(format_time(f64::INFINITY), "-");
        assert_eq!(format_option(None), "-");
        assert_eq!(format_option(Some(1_000.0)), "00:01.00");
    }

    #[test]
    fn test_parse_seconds() {
        assert_eq!(parse_seconds("12.34"), Some(12_340));
        assert_eq!(parse_seconds(" 7 "), Some(7_000));
        assert_eq!(parse_seconds("12.3"), Some(12_300));
        assert_eq!(parse_seconds("0"), Some(0));
        assert_eq!(parse_seconds("01:02.50"), Some(62_500));
    }

    #[test]
    fn test_parse_seconds_rejects_invalid() {
        assert_eq!(parse_seconds(""), None);
        assert_eq!(parse_seconds("abc"), None);
        assert_eq!(parse_seconds("-1"), None);
        assert_eq!(parse_seconds("NaN"), None);
        assert_eq!(parse_seconds("inf"), None);
        assert_eq!(parse_seconds("1:75.00"), None);
        assert_eq!(parse_seconds("-1:05.00"), None);
    }

    #[test]
    fn test_parse_seconds_rejects_unrepresentable() {
        assert_eq!(parse_seconds("1e300"), None);
        assert_eq!(parse_seconds("1e17"), None);
        assert_eq!(parse_seconds("18446744073709551615:00.00"), None);
        assert_eq!(parse_seconds("1e12"), Some(1_000_000_000_000_000));
    }

    #[test]
    fn test_format_parse_round_trip() {
        for t in [0, 10, 990, 12_340, 59_990, 60_000, 754_320, 3_723_450] {
            assert_eq!(parse_seconds(&format_millis(t)), Some(t), "t = {}", t);
        }
    }
}
