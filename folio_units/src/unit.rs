// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Measurement units and their relation to points.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// A display unit for lengths.
///
/// Points are the canonical internal unit; every other unit is defined by how many
/// points one unit spans.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Unit {
    /// Typographic point, 1/72 inch. The canonical unit.
    #[default]
    #[serde(rename = "pt")]
    Points,
    /// CSS pixel, 1/96 inch.
    #[serde(rename = "px")]
    Pixels,
    /// Pica, 12 points.
    #[serde(rename = "pc")]
    Picas,
    /// Inch.
    #[serde(rename = "in")]
    Inches,
    /// Millimeter.
    #[serde(rename = "mm")]
    Millimeters,
    /// Centimeter.
    #[serde(rename = "cm")]
    Centimeters,
}

impl Unit {
    /// Every unit, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Points,
        Self::Pixels,
        Self::Picas,
        Self::Inches,
        Self::Millimeters,
        Self::Centimeters,
    ];

    /// Number of points in one of this unit.
    pub const fn points_per_unit(self) -> f64 {
        match self {
            Self::Points => 1.0,
            Self::Pixels => 0.75,
            Self::Picas => 12.0,
            Self::Inches => 72.0,
            Self::Millimeters => 72.0 / 25.4,
            Self::Centimeters => 72.0 / 2.54,
        }
    }

    /// The short suffix used when writing lengths, e.g. `mm`.
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Points => "pt",
            Self::Pixels => "px",
            Self::Picas => "pc",
            Self::Inches => "in",
            Self::Millimeters => "mm",
            Self::Centimeters => "cm",
        }
    }

    /// Look up a unit by suffix, ignoring ASCII case.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|u| u.suffix().eq_ignore_ascii_case(suffix))
    }

    /// Convert `value` expressed in this unit to points.
    pub fn to_points(self, value: f64) -> f64 {
        value * self.points_per_unit()
    }

    /// Convert `points` to a value expressed in this unit.
    pub fn value_from_points(self, points: f64) -> f64 {
        points / self.points_per_unit()
    }
}

impl core::fmt::Display for Unit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.suffix())
    }
}

impl core::str::FromStr for Unit {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::from_suffix(s).ok_or_else(|| ParseError::UnknownUnit(s.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn near(a: f64, b: f64) -> bool {
        let d = a - b;
        -1e-9 < d && d < 1e-9
    }

    #[test]
    fn inch_relations() {
        assert_eq!(Unit::Inches.to_points(1.0), 72.0);
        assert_eq!(Unit::Pixels.to_points(96.0), 72.0);
        assert_eq!(Unit::Picas.to_points(6.0), 72.0);
        assert!(near(Unit::Millimeters.to_points(25.4), 72.0));
        assert!(near(Unit::Centimeters.to_points(2.54), 72.0));
    }

    #[test]
    fn suffix_lookup_is_case_insensitive() {
        assert_eq!(Unit::from_suffix("MM"), Some(Unit::Millimeters));
        assert_eq!(Unit::from_suffix("pt"), Some(Unit::Points));
        assert_eq!(Unit::from_suffix("furlong"), None);
        assert_eq!(" in ".parse::<Unit>(), Ok(Unit::Inches));
        assert!("yd".parse::<Unit>().is_err());
    }

    #[test]
    fn from_points_inverts_to_points() {
        for unit in Unit::ALL {
            let back = unit.value_from_points(unit.to_points(12.5));
            assert!(near(back, 12.5), "{unit} did not round trip");
        }
    }
}
