//! Exact numeric literals.
//!
//! Every number read from LaTeX is kept as an arbitrary precision rational so
//! that `0.1 + 0.2` and `\frac{1}{3}` stay exact until a caller asks for `f64`.

use dashu::base::{Inverse, Signed as DashuSigned};
use dashu::integer::{IBig, UBig};
use dashu::rational::RBig;
use std::fmt;

/// An exact rational value stored in lowest terms.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Number(RBig);

impl Number {
    pub fn zero() -> Self {
        Number(RBig::ZERO)
    }

    pub fn one() -> Self {
        Number(RBig::ONE)
    }

    /// 1/2, the exponent of a square root
    pub fn half() -> Self {
        Number(RBig::from_parts(IBig::ONE, UBig::from(2u8)))
    }

    pub fn integer(value: i64) -> Self {
        Number(RBig::from(IBig::from(value)))
    }

    /// `numerator / denominator`, or `None` for a zero denominator
    pub fn ratio(numerator: i64, denominator: i64) -> Option<Self> {
        if denominator == 0 {
            return None;
        }
        let value = RBig::from_parts(
            IBig::from(numerator),
            UBig::from(denominator.unsigned_abs()),
        );
        Some(Number(if denominator < 0 { -value } else { value }))
    }

    /// Parse a NUMBER token.
    ///
    /// Thousands separators are dropped, leading zeros are stripped while at
    /// least one digit is kept, and a decimal fraction is read exactly
    /// (`"2.50"` is `5/2`).
    pub fn parse_literal(text: &str) -> Option<Self> {
        let cleaned: String = text.chars().filter(|c| *c != ',').collect();
        if !cleaned.chars().any(|c| c.is_ascii_digit()) {
            return None;
        }
        let trimmed = cleaned.trim_start_matches('0');
        let normalized = if trimmed.is_empty() || trimmed.starts_with('.') {
            format!("0{}", trimmed)
        } else {
            trimmed.to_string()
        };

        let (whole, fraction) = match normalized.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (normalized.as_str(), ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return None;
        }
        if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
            return None;
        }

        let digits = format!("{}{}", whole, fraction);
        let numerator: IBig = digits.parse().ok()?;
        let denominator = UBig::from(10u8).pow(fraction.len());
        Some(Number(RBig::from_parts(numerator, denominator)))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == RBig::ZERO
    }

    pub fn is_one(&self) -> bool {
        self.0 == RBig::ONE
    }

    pub fn is_neg_one(&self) -> bool {
        self.0 == RBig::NEG_ONE
    }

    pub fn is_negative(&self) -> bool {
        DashuSigned::is_negative(&self.0)
    }

    pub fn is_integer(&self) -> bool {
        *self.0.denominator() == UBig::ONE
    }

    /// The value as `i64` when it is an integer that fits
    pub fn as_i64(&self) -> Option<i64> {
        if !self.is_integer() {
            return None;
        }
        self.0.numerator().clone().try_into().ok()
    }

    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().value()
    }

    pub fn add(&self, other: &Number) -> Number {
        Number(&self.0 + &other.0)
    }

    pub fn sub(&self, other: &Number) -> Number {
        Number(&self.0 - &other.0)
    }

    pub fn mul(&self, other: &Number) -> Number {
        Number(&self.0 * &other.0)
    }

    pub fn neg(&self) -> Number {
        Number(-self.0.clone())
    }

    /// Multiplicative inverse, `None` for zero
    pub fn recip(&self) -> Option<Number> {
        if self.is_zero() {
            None
        } else {
            Some(Number(self.0.clone().inv()))
        }
    }

    pub fn div(&self, other: &Number) -> Option<Number> {
        other.recip().map(|inv| self.mul(&inv))
    }

    /// Integer power; negative exponents go through the reciprocal.
    /// Exponents above `MAX_EXACT_EXPONENT` are left to the caller.
    pub fn powi(&self, exponent: i64) -> Option<Number> {
        const MAX_EXACT_EXPONENT: u64 = 1024;
        let magnitude = exponent.unsigned_abs();
        if magnitude > MAX_EXACT_EXPONENT {
            return None;
        }
        let base = if exponent < 0 { self.recip()? } else { self.clone() };
        Some(Number(base.0.pow(magnitude as usize)))
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::integer(value)
    }
}

impl fmt::Debug for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Number({})", self)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.0.numerator())
        } else {
            write!(f, "{}/{}", self.0.numerator(), self.0.denominator())
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::float_cmp,
    reason = "Standard test relaxations"
)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer_literals() {
        assert_eq!(Number::parse_literal("42"), Some(Number::integer(42)));
        assert_eq!(Number::parse_literal("007"), Some(Number::integer(7)));
        assert_eq!(Number::parse_literal("000"), Some(Number::zero()));
        assert_eq!(
            Number::parse_literal("1,000,000"),
            Some(Number::integer(1_000_000))
        );
    }

    #[test]
    fn test_parse_decimal_literals_exactly() {
        assert_eq!(Number::parse_literal("2.50"), Number::ratio(5, 2));
        assert_eq!(Number::parse_literal(".5"), Number::ratio(1, 2));
        assert_eq!(Number::parse_literal("0.25"), Number::ratio(1, 4));
        assert_eq!(Number::parse_literal("1.0"), Some(Number::one()));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Number::parse_literal("."), None);
        assert_eq!(Number::parse_literal("1.2.3"), None);
        assert_eq!(Number::parse_literal("12a"), None);
    }

    #[test]
    fn test_arithmetic() {
        let half = Number::ratio(1, 2).unwrap();
        let third = Number::ratio(1, 3).unwrap();
        assert_eq!(half.add(&third), Number::ratio(5, 6).unwrap());
        assert_eq!(half.sub(&third), Number::ratio(1, 6).unwrap());
        assert_eq!(half.mul(&third), Number::ratio(1, 6).unwrap());
        assert_eq!(half.div(&third), Number::ratio(3, 2));
        assert_eq!(half.div(&Number::zero()), None);
        assert!(Number::integer(-1).is_neg_one());
        assert!(half.neg().is_negative());
    }

    #[test]
    fn test_powi() {
        let two = Number::integer(2);
        assert_eq!(two.powi(10), Some(Number::integer(1024)));
        assert_eq!(two.powi(-2), Number::ratio(1, 4));
        assert_eq!(Number::zero().powi(-1), None);
        assert_eq!(two.powi(0), Some(Number::one()));
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Number::integer(-12).as_i64(), Some(-12));
        assert_eq!(Number::ratio(1, 2).unwrap().as_i64(), None);
        assert_eq!(Number::ratio(1, 4).unwrap().to_f64(), 0.25);
        assert_eq!(Number::ratio(-3, 6).unwrap().to_string(), "-1/2");
        assert_eq!(Number::ratio(6, -3).unwrap().to_string(), "-2");
    }
}
