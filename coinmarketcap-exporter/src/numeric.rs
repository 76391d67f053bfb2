//! Conversion of numeric-as-text ticker fields.
//!
//! The ticker API transmits every number as a JSON string. An empty string
//! means the value is absent and maps to zero; anything else must parse.

use crate::error::NumericError;

/// Digits after the decimal point for float metrics.
pub const DEFAULT_PRECISION: usize = 6;

/// Parse an integer field, mapping the empty string to `0`.
pub fn parse_int_or_zero(text: &str) -> Result<i64, NumericError> {
    if text.is_empty() {
        return Ok(0);
    }
    text.parse().map_err(|_| NumericError {
        kind: "integer",
        text: text.to_string(),
    })
}

/// Parse a float field, mapping the empty string to `0.0`.
pub fn parse_float_or_zero(text: &str) -> Result<f64, NumericError> {
    if text.is_empty() {
        return Ok(0.0);
    }
    text.parse().map_err(|_| NumericError {
        kind: "float",
        text: text.to_string(),
    })
}

/// Render a float as fixed-point text with `precision` fractional digits.
///
/// Non-finite values use the Prometheus spellings (`NaN`, `+Inf`, `-Inf`).
/// Negative zero is rendered as zero.
pub fn format_float(value: f64, precision: usize) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            "+Inf".to_string()
        } else {
            "-Inf".to_string()
        }
    } else {
        let text = format!("{:.*}", precision, value);
        // -0.0 and tiny negatives that round to zero
        if text.starts_with('-') && text[1..].bytes().all(|b| b == b'0' || b == b'.') {
            text[1..].to_string()
        } else {
            text
        }
    }
}
