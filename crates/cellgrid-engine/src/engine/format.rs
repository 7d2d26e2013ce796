//! Numeric coercion and display formatting.
//!
//! Cell values are strings; the aggregate functions read them as numbers the
//! way a browser does (`parseFloat`) and print results the way a browser does
//! (`Number#toString`, `Number#toFixed`). Keeping those rules in one place
//! means a sheet shows the same text no matter which host computed it.

use regex::Regex;
use std::sync::OnceLock;

/// Whitespace skipped by [`parse_number`] and by blank-cell checks.
pub(crate) fn is_blank_char(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// Whether a cell counts as blank (empty after trimming whitespace).
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim_matches(is_blank_char).is_empty()
}

fn numeric_prefix_re() -> &'static Regex {
    static NUMERIC_RE: OnceLock<Regex> = OnceLock::new();
    NUMERIC_RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
            .expect("numeric prefix regex must compile")
    })
}

/// Read the longest numeric prefix of a cell value.
///
/// Leading whitespace is skipped and trailing garbage ignored, so `" 12px"`
/// reads as 12. Returns None when no number starts the value (`"x"`, `""`).
pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim_start_matches(is_blank_char);
    let prefix = numeric_prefix_re().find(trimmed)?;
    prefix.as_str().parse::<f64>().ok()
}

/// Format a number for display.
///
/// Integers print without a fraction, other values use the shortest text that
/// reads back to the same number. Magnitudes from 1e21 up, or below 1e-6,
/// switch to exponent form (`1e+21`, `1.5e-7`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let abs = n.abs();
    if abs >= 1e21 || abs < 1e-6 {
        let text = format!("{:e}", n);
        match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => text,
        }
    } else {
        format!("{}", n)
    }
}

/// Format a number with a fixed number of decimals.
///
/// Exact halfway cases round away from zero (`0.125` -> `"0.13"`), unlike
/// Rust's formatter which rounds them to even.
pub fn format_fixed(n: f64, digits: usize) -> String {
    if !n.is_finite() || n.abs() >= 1e21 {
        return format_number(n);
    }
    // Drop the sign of negative zero.
    let n = if n == 0.0 { 0.0 } else { n };

    // A halfway case needs an exact binary value with at most `digits + 1`
    // decimals, i.e. `n * 2^(digits + 1)` is an integer.
    let exp = digits as i32 + 1;
    if (n * 2f64.powi(exp)).fract() == 0.0 {
        let scaled = n.abs() * 10f64.powi(exp);
        if scaled < 9.0e15 && scaled % 10.0 == 5.0 {
            let rounded = (scaled / 10.0).ceil() / 10f64.powi(exp - 1);
            let sign = if n < 0.0 { "-" } else { "" };
            return format!("{}{:.*}", sign, digits, rounded);
        }
    }

    format!("{:.*}", digits, n)
}
