// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Folio Units: measurement units and length expressions.
//!
//! - [`Unit`]: points, pixels, picas, inches, millimeters, centimeters. Points are canonical.
//! - [`Length`]: a value tagged with its unit, convertible to any other unit.
//! - [`Length::parse`]: bare numbers, suffixed lengths (`12mm`), and arithmetic over them
//!   (`(210mm - 2 * 1in) / 3`).
//! - [`format_number`]: compact decimal rendering for display.
//!
//! Float inputs are assumed to be finite; parsing rejects expressions that evaluate to
//! infinity or NaN.
//!
//! # Example
//!
//! ```rust
//! use folio_units::{format_number, Length, Unit};
//!
//! let width = Length::parse("210mm - 2 * 10mm", Unit::Millimeters).unwrap();
//! assert_eq!(format_number(width.value, 3), "190");
//! assert_eq!(format_number(width.to_unit(Unit::Centimeters), 3), "19");
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod format;
mod length;
mod parse;
mod unit;

pub use error::ParseError;
pub use format::format_number;
pub use length::Length;
pub use unit::Unit;
