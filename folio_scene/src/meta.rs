// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Document metadata keys, their defaults, and scene configuration.

use folio_units::Unit;

use crate::props::{PropertyDecl, PropertyFlags};

/// Schema version written by this crate.
pub const SCHEMA_VERSION: i64 = 1;

/// Default gap between neighbouring pages, in document units.
pub const PAGE_SPACING: f64 = 10.0;

/// Schema version of the persisted document.
pub const VERSION: &str = "version";
/// Displayed measurement unit.
pub const UNIT: &str = "unit";
/// Snapping tolerance.
pub const SNAP_DIST: &str = "snapDist";
/// Selection-picking tolerance.
pub const PICK_DIST: &str = "pickDist";
/// Small cursor-nudge distance.
pub const CR_DIST_SMALL: &str = "crDistSmall";
/// Large cursor-nudge distance.
pub const CR_DIST_BIG: &str = "crDistBig";
/// Angular constraint for constrained cursor movement, in radians.
pub const CR_CONSTRAINT: &str = "crConstraint";
/// Horizontal grid spacing.
pub const GRID_SIZE_X: &str = "gridSizeX";
/// Vertical grid spacing.
pub const GRID_SIZE_Y: &str = "gridSizeY";
/// Whether the grid is shown and snapped to.
pub const GRID_ACTIVE: &str = "gridActive";

/// The scene's metadata declarations.
///
/// Only a change of [`UNIT`] repaints: every displayed length depends on it.
pub fn declarations() -> Vec<PropertyDecl> {
    vec![
        PropertyDecl::new(VERSION, SCHEMA_VERSION),
        PropertyDecl::new(UNIT, Unit::Points)
            .with_flags(PropertyFlags::PERSIST | PropertyFlags::REPAINT),
        PropertyDecl::new(SNAP_DIST, 3.0),
        PropertyDecl::new(PICK_DIST, 3.0),
        PropertyDecl::new(CR_DIST_SMALL, 1.0),
        PropertyDecl::new(CR_DIST_BIG, 10.0),
        PropertyDecl::new(CR_CONSTRAINT, 0.0),
        PropertyDecl::new(GRID_SIZE_X, 10.0),
        PropertyDecl::new(GRID_SIZE_Y, 10.0),
        PropertyDecl::new(GRID_ACTIVE, false),
    ]
}

/// Tunables owned by a [`Scene`](crate::Scene).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneConfig {
    /// Gap kept between pages by placement and overlap checks.
    pub page_spacing: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            page_spacing: PAGE_SPACING,
        }
    }
}
