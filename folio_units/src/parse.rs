// Copyright 2025 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recursive-descent evaluator for length expressions.
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := ('+' | '-') factor | '(' expr ')' | number unit?
//! ```
//!
//! Operands either carry a unit (held in points) or are plain scalars. Scalars that meet a
//! length under `+`/`-` are read in the default unit; `*` and `/` scale lengths by scalars,
//! and dividing two lengths yields a ratio.

use alloc::string::String;

use crate::error::ParseError;
use crate::unit::Unit;

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Quantity {
    Scalar(f64),
    Points(f64),
}

pub(crate) fn evaluate(text: &str, default_unit: Unit) -> Result<Quantity, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    let mut parser = Parser {
        src: text,
        pos: 0,
        default_unit,
    };
    let quantity = parser.expr()?;
    parser.skip_ws();
    match parser.peek() {
        Some(ch) => Err(ParseError::UnexpectedChar {
            ch,
            pos: parser.pos,
        }),
        None => Ok(quantity),
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    default_unit: Unit,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expr(&mut self) -> Result<Quantity, ParseError> {
        let mut lhs = self.term()?;
        loop {
            self.skip_ws();
            match self.peek() {
                Some(op @ ('+' | '-')) => {
                    self.bump();
                    let rhs = self.term()?;
                    lhs = self.add(lhs, rhs, op == '-');
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn term(&mut self) -> Result<Quantity, ParseError> {
        let mut lhs = self.factor()?;
        loop {
            self.skip_ws();
            match self.peek() {
                Some('*') => {
                    self.bump();
                    let rhs = self.factor()?;
                    lhs = mul(lhs, rhs)?;
                }
                Some('/') => {
                    self.bump();
                    let rhs = self.factor()?;
                    lhs = div(lhs, rhs)?;
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn factor(&mut self) -> Result<Quantity, ParseError> {
        self.skip_ws();
        match self.peek() {
            None => Err(ParseError::UnexpectedEnd),
            Some('-') => {
                self.bump();
                Ok(match self.factor()? {
                    Quantity::Scalar(v) => Quantity::Scalar(-v),
                    Quantity::Points(p) => Quantity::Points(-p),
                })
            }
            Some('+') => {
                self.bump();
                self.factor()
            }
            Some('(') => {
                self.bump();
                let inner = self.expr()?;
                self.skip_ws();
                let pos = self.pos;
                match self.bump() {
                    Some(')') => Ok(inner),
                    Some(ch) => Err(ParseError::UnexpectedChar { ch, pos }),
                    None => Err(ParseError::UnexpectedEnd),
                }
            }
            Some(ch) if ch.is_ascii_digit() || ch == '.' || ch == ',' => self.number(),
            Some(ch) => Err(ParseError::UnexpectedChar { ch, pos: self.pos }),
        }
    }

    fn number(&mut self) -> Result<Quantity, ParseError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || c == '.' || c == ',')
        {
            self.bump();
        }
        let literal: String = self.src[start..self.pos].replace(',', ".");
        let value: f64 = literal
            .parse()
            .map_err(|_| ParseError::InvalidNumber(literal.clone()))?;

        self.skip_ws();
        let suffix_start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.bump();
        }
        if suffix_start == self.pos {
            return Ok(Quantity::Scalar(value));
        }
        let suffix = &self.src[suffix_start..self.pos];
        let unit = Unit::from_suffix(suffix).ok_or_else(|| ParseError::UnknownUnit(suffix.into()))?;
        Ok(Quantity::Points(unit.to_points(value)))
    }

    fn add(&self, lhs: Quantity, rhs: Quantity, subtract: bool) -> Quantity {
        let sign = if subtract { -1.0 } else { 1.0 };
        match (lhs, rhs) {
            (Quantity::Scalar(a), Quantity::Scalar(b)) => Quantity::Scalar(a + sign * b),
            _ => Quantity::Points(self.points(lhs) + sign * self.points(rhs)),
        }
    }

    fn points(&self, q: Quantity) -> f64 {
        match q {
            Quantity::Scalar(v) => self.default_unit.to_points(v),
            Quantity::Points(p) => p,
        }
    }
}

fn mul(lhs: Quantity, rhs: Quantity) -> Result<Quantity, ParseError> {
    Ok(match (lhs, rhs) {
        (Quantity::Scalar(a), Quantity::Scalar(b)) => Quantity::Scalar(a * b),
        (Quantity::Points(p), Quantity::Scalar(s)) | (Quantity::Scalar(s), Quantity::Points(p)) => {
            Quantity::Points(p * s)
        }
        (Quantity::Points(_), Quantity::Points(_)) => {
            return Err(ParseError::IncompatibleUnits { op: '*' });
        }
    })
}

fn div(lhs: Quantity, rhs: Quantity) -> Result<Quantity, ParseError> {
    let divisor = match rhs {
        Quantity::Scalar(v) | Quantity::Points(v) => v,
    };
    if divisor == 0.0 {
        return Err(ParseError::DivisionByZero);
    }
    Ok(match (lhs, rhs) {
        (Quantity::Scalar(a), Quantity::Scalar(b)) => Quantity::Scalar(a / b),
        (Quantity::Points(p), Quantity::Scalar(s)) => Quantity::Points(p / s),
        (Quantity::Points(a), Quantity::Points(b)) => Quantity::Scalar(a / b),
        (Quantity::Scalar(_), Quantity::Points(_)) => {
            return Err(ParseError::IncompatibleUnits { op: '/' });
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(text: &str) -> Result<Quantity, ParseError> {
        evaluate(text, Unit::Points)
    }

    #[test]
    fn precedence_and_parentheses() {
        assert_eq!(eval("1 + 2 * 3"), Ok(Quantity::Scalar(7.0)));
        assert_eq!(eval("(1 + 2) * 3"), Ok(Quantity::Scalar(9.0)));
        assert_eq!(eval("-(2 - 5)"), Ok(Quantity::Scalar(3.0)));
        assert_eq!(eval("10 - 2 - 3"), Ok(Quantity::Scalar(5.0)));
    }

    #[test]
    fn scalars_meet_lengths_in_default_unit() {
        assert_eq!(evaluate("1in + 1", Unit::Inches), Ok(Quantity::Points(144.0)));
        assert_eq!(eval("1in - 2"), Ok(Quantity::Points(70.0)));
    }

    #[test]
    fn scaling_and_ratios() {
        assert_eq!(eval("2 * 1in"), Ok(Quantity::Points(144.0)));
        assert_eq!(eval("1in / 2"), Ok(Quantity::Points(36.0)));
        assert_eq!(eval("1in / 1pc"), Ok(Quantity::Scalar(6.0)));
        assert_eq!(
            eval("1in * 1in"),
            Err(ParseError::IncompatibleUnits { op: '*' })
        );
        assert_eq!(
            eval("2 / 1in"),
            Err(ParseError::IncompatibleUnits { op: '/' })
        );
    }

    #[test]
    fn syntax_errors_carry_positions() {
        assert_eq!(eval("1 +"), Err(ParseError::UnexpectedEnd));
        assert_eq!(eval("(1 + 2"), Err(ParseError::UnexpectedEnd));
        assert_eq!(
            eval("1 2"),
            Err(ParseError::UnexpectedChar { ch: '2', pos: 2 })
        );
        assert_eq!(
            eval("1 # 2"),
            Err(ParseError::UnexpectedChar { ch: '#', pos: 2 })
        );
        assert_eq!(eval("1.2.3"), Err(ParseError::InvalidNumber("1.2.3".into())));
        assert_eq!(eval("   "), Err(ParseError::Empty));
    }
}
