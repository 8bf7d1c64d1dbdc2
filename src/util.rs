// Utility helpers for parsing and basic statistics.
//
// This module centralizes the date/number handling so the rest of the code
// can assume clean, typed values.
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};

pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    // CSV dates are expected in `YYYY-MM-DD` format.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

pub fn mean(v: &[f64]) -> f64 {
    // Standard arithmetic mean; returns 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

/// Sample quantile with linear interpolation between order statistics.
///
/// Takes an already-sorted slice and `p` in `[0, 1]`. This is the same
/// interpolation rule most tabular libraries default to, so for nine
/// equally spaced values the 1/3 and 2/3 cuts land between the 3rd/4th and
/// 6th/7th values respectively.
pub fn quantile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let h = (n - 1) as f64 * p.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = h - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    let neg = n.is_sign_negative();
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    } else if decimals > 0 {
        res.push('.');
        res.push_str(&"0".repeat(decimals));
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for integer-like values, used for the
    // scalar metrics and console diagnostics (e.g., `3,392 rentals`).
    n.to_formatted_string(&Locale::en)
}

/// Render a mean with one decimal place for table cells.
pub fn display_mean(value: &f64) -> String {
    format_number(*value, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates_only() {
        assert_eq!(
            parse_date_safe(Some("2011-01-01")),
            NaiveDate::from_ymd_opt(2011, 1, 1)
        );
        assert!(parse_date_safe(Some(" 2012-12-31 ")).is_some());
        assert_eq!(parse_date_safe(Some("01/02/2011")), None);
        assert_eq!(parse_date_safe(Some("")), None);
        assert_eq!(parse_date_safe(None), None);
    }

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[10.0, 20.0]), 15.0);
    }

    #[test]
    fn quantile_interpolates_linearly() {
        let v: Vec<f64> = (1..=9).map(|x| x as f64).collect();
        let q1 = quantile(&v, 1.0 / 3.0);
        let q2 = quantile(&v, 2.0 / 3.0);
        assert!((q1 - 3.6666).abs() < 1e-3);
        assert!((q2 - 6.3333).abs() < 1e-3);
        assert_eq!(quantile(&v, 0.0), 1.0);
        assert_eq!(quantile(&v, 1.0), 9.0);
        assert_eq!(quantile(&[42.0], 0.5), 42.0);
    }

    #[test]
    fn formats_numbers_with_separators() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-42.0, 1), "-42.0");
        assert_eq!(format_int(9855i64), "9,855");
    }
}
