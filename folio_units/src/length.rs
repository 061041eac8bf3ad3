// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lengths: a number tagged with the unit it is expressed in.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::parse::{self, Quantity};
use crate::unit::Unit;

/// A number expressed in a [`Unit`].
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Length {
    /// Magnitude in `unit`.
    pub value: f64,
    /// The unit `value` is expressed in.
    pub unit: Unit,
}

impl Length {
    /// Create a length.
    pub const fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// A length in points, the canonical unit.
    pub const fn points(value: f64) -> Self {
        Self::new(value, Unit::Points)
    }

    /// Magnitude in points.
    pub fn to_points(self) -> f64 {
        self.unit.to_points(self.value)
    }

    /// Magnitude in `unit`.
    pub fn to_unit(self, unit: Unit) -> f64 {
        if unit == self.unit {
            return self.value;
        }
        unit.value_from_points(self.to_points())
    }

    /// The same length re-expressed in `unit`.
    pub fn convert(self, unit: Unit) -> Self {
        Self::new(self.to_unit(unit), unit)
    }

    /// Parse a bare number, a length with a unit suffix, or an arithmetic expression.
    ///
    /// Numbers without a suffix are taken to be in `default_unit`, and the result is
    /// expressed in `default_unit`:
    ///
    /// ```
    /// use folio_units::{Length, Unit};
    ///
    /// let l = Length::parse("1in + 36", Unit::Points).unwrap();
    /// assert_eq!(l, Length::new(108.0, Unit::Points));
    ///
    /// let l = Length::parse("(10mm + 2cm) / 3", Unit::Millimeters).unwrap();
    /// assert!((l.value - 10.0).abs() < 1e-9);
    /// ```
    pub fn parse(text: &str, default_unit: Unit) -> Result<Self, ParseError> {
        let value = match parse::evaluate(text, default_unit)? {
            Quantity::Points(points) => default_unit.value_from_points(points),
            Quantity::Scalar(value) => value,
        };
        if !value.is_finite() {
            return Err(ParseError::NonFinite);
        }
        Ok(Self::new(value, default_unit))
    }
}

impl core::fmt::Display for Length {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_between_units() {
        let l = Length::new(2.0, Unit::Inches);
        assert_eq!(l.to_points(), 144.0);
        assert_eq!(l.to_unit(Unit::Picas), 12.0);
        assert_eq!(l.to_unit(Unit::Inches), 2.0);
        assert_eq!(l.convert(Unit::Pixels), Length::new(192.0, Unit::Pixels));
    }

    #[test]
    fn bare_number_takes_default_unit() {
        assert_eq!(
            Length::parse("12", Unit::Millimeters),
            Ok(Length::new(12.0, Unit::Millimeters))
        );
        assert_eq!(
            Length::parse(" 1,5 ", Unit::Inches),
            Ok(Length::new(1.5, Unit::Inches))
        );
    }

    #[test]
    fn suffix_is_converted_to_default_unit() {
        assert_eq!(
            Length::parse("1in", Unit::Points),
            Ok(Length::new(72.0, Unit::Points))
        );
        assert_eq!(
            Length::parse("72 pt", Unit::Inches),
            Ok(Length::new(1.0, Unit::Inches))
        );
    }

    #[test]
    fn failures_are_reported() {
        assert_eq!(Length::parse("", Unit::Points), Err(ParseError::Empty));
        assert_eq!(
            Length::parse("3 yd", Unit::Points),
            Err(ParseError::UnknownUnit("yd".into()))
        );
        assert_eq!(
            Length::parse("4 / 0", Unit::Points),
            Err(ParseError::DivisionByZero)
        );
        assert!(Length::parse("abc", Unit::Points).is_err());
    }

    #[test]
    fn display_uses_suffix() {
        let text = alloc::format!("{}", Length::new(3.5, Unit::Millimeters));
        assert_eq!(text, "3.5mm");
    }
}
