// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable number formatting.

use alloc::format;
use alloc::string::String;

/// Format `value` with at most `decimals` fractional digits.
///
/// Trailing zeros and a dangling decimal point are dropped, and negative zero prints as `0`.
///
/// ```
/// use folio_units::format_number;
///
/// assert_eq!(format_number(12.5, 3), "12.5");
/// assert_eq!(format_number(1.0 / 3.0, 3), "0.333");
/// assert_eq!(format_number(2.0, 3), "2");
/// assert_eq!(format_number(-0.0001, 3), "0");
/// ```
pub fn format_number(value: f64, decimals: usize) -> String {
    let mut text = format!("{value:.decimals$}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text.truncate(0);
        text.push('0');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_precision() {
        assert_eq!(format_number(1.23456, 3), "1.235");
        assert_eq!(format_number(1.23456, 0), "1");
        assert_eq!(format_number(-7.26, 1), "-7.3");
    }

    #[test]
    fn keeps_integer_zeros() {
        assert_eq!(format_number(100.0, 3), "100");
        assert_eq!(format_number(100.0, 0), "100");
        assert_eq!(format_number(0.0, 2), "0");
    }

    #[test]
    fn negative_zero_is_plain_zero() {
        assert_eq!(format_number(-0.0, 3), "0");
        assert_eq!(format_number(-0.0004, 3), "0");
    }
}
