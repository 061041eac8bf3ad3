// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors produced while parsing lengths and units.

use alloc::string::String;

use thiserror::Error;

/// Failure to turn text into a [`Length`](crate::Length) or [`Unit`](crate::Unit).
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ParseError {
    /// The input held nothing but whitespace.
    #[error("empty length expression")]
    Empty,

    /// A character that cannot start or continue a token.
    #[error("unexpected character {ch:?} at byte {pos}")]
    UnexpectedChar {
        /// The offending character.
        ch: char,
        /// Byte offset into the input.
        pos: usize,
    },

    /// The input ended where an operand or `)` was required.
    #[error("unexpected end of length expression")]
    UnexpectedEnd,

    /// A unit suffix that is not known.
    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    /// A numeric literal that does not parse.
    #[error("invalid number: {0}")]
    InvalidNumber(String),

    /// Division by a zero operand.
    #[error("division by zero")]
    DivisionByZero,

    /// An operation whose result is not a length, e.g. `2mm * 3mm`.
    #[error("incompatible operands for {op:?}")]
    IncompatibleUnits {
        /// The operator that was applied.
        op: char,
    },

    /// The expression evaluated to infinity or NaN.
    #[error("length is not finite")]
    NonFinite,
}
