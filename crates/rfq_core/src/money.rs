//! Integer-first money: amounts are held in **minor units** (cents).
//!
//! - No float math anywhere; ratios are rounded half-to-even on integers.
//! - Wire form is a decimal string with at most two fraction digits
//!   (`"1250.4"`, `"1250.40"`, `"-3"`); `Display` always prints two.
//! - VAT is a fixed 20 % of the base amount.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Sub};
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::CoreError;

/// Minor units per major unit.
pub const MINOR_PER_MAJOR: i64 = 100;

/// VAT rate in basis points (20.00 %).
pub const VAT_RATE_BP: i64 = 2_000;

const BP_DENOM: i64 = 10_000;

/// Round `num / den` half-to-even. `den` must be positive.
pub fn div_round_half_even(num: i128, den: i128) -> i128 {
    debug_assert!(den > 0);
    let q = num.div_euclid(den);
    let r = num.rem_euclid(den);
    match (2 * r).cmp(&den) {
        core::cmp::Ordering::Less => q,
        core::cmp::Ordering::Greater => q + 1,
        core::cmp::Ordering::Equal => {
            if q % 2 == 0 { q } else { q + 1 }
        }
    }
}

#[inline]
fn narrow(v: i128) -> Result<i64, CoreError> {
    i64::try_from(v).map_err(|_| CoreError::AmountOverflow)
}

/// Monetary amount in minor units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Whole major units (e.g. `Money::from_major(12)` == 12.00).
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * MINOR_PER_MAJOR)
    }

    #[inline]
    pub const fn minor(self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// `self * quantity` (line total from a unit price).
    pub fn checked_mul_qty(self, quantity: u32) -> Option<Money> {
        self.0.checked_mul(i64::from(quantity)).map(Money)
    }

    /// Unit price implied by a line total: `round_half_even(self / quantity)`.
    /// A zero quantity yields zero.
    pub fn per_unit(self, quantity: u32) -> Money {
        if quantity == 0 {
            return Money::ZERO;
        }
        // |result| <= |self|, so narrowing cannot fail.
        Money(div_round_half_even(i128::from(self.0), i128::from(quantity)) as i64)
    }

    /// VAT on this base amount: `round_half_even(base * 0.20)`.
    pub fn vat(self) -> Money {
        // |result| < |self|, so narrowing cannot fail.
        Money(div_round_half_even(
            i128::from(self.0) * i128::from(VAT_RATE_BP),
            i128::from(BP_DENOM),
        ) as i64)
    }

    /// Amount including VAT: `base + vat(base)`.
    pub fn with_vat(self) -> Result<Money, CoreError> {
        narrow(i128::from(self.0) + i128::from(self.vat().0)).map(Money)
    }

    /// Checked sum over an iterator of amounts.
    pub fn checked_sum<I: IntoIterator<Item = Money>>(iter: I) -> Option<Money> {
        iter.into_iter().try_fold(Money::ZERO, Money::checked_add)
    }
}

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;
    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |a, b| a + b)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per = MINOR_PER_MAJOR as u64;
        write!(f, "{sign}{}.{:02}", abs / per, abs % per)
    }
}

impl FromStr for Money {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || CoreError::InvalidAmount(s.to_string());
        let t = s.trim();
        let (neg, body) = match t.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, t),
        };
        let (int_part, frac_part) = match body.split_once('.') {
            Some((i, f)) => (i, f),
            None => (body, ""),
        };
        if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(bad());
        }
        if frac_part.len() > 2 || !frac_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(bad());
        }
        if body.ends_with('.') {
            return Err(bad());
        }
        let major: i64 = int_part.parse().map_err(|_| bad())?;
        let mut frac: i64 = if frac_part.is_empty() { 0 } else { frac_part.parse().map_err(|_| bad())? };
        if frac_part.len() == 1 {
            frac *= 10;
        }
        let minor = major
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|m| m.checked_add(frac))
            .ok_or(CoreError::AmountOverflow)?;
        Ok(Money(if neg { -minor } else { minor }))
    }
}

#[cfg(feature = "serde")]
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        use serde::de::{Error as _, Unexpected};
        let s = String::deserialize(d)?;
        s.parse()
            .map_err(|_| D::Error::invalid_value(Unexpected::Str(&s), &"decimal amount with at most 2 fraction digits"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_even() {
        assert_eq!(div_round_half_even(5, 2), 2);
        assert_eq!(div_round_half_even(7, 2), 4);
        assert_eq!(div_round_half_even(-5, 2), -2);
        assert_eq!(div_round_half_even(11, 4), 3);
        assert_eq!(div_round_half_even(9, 4), 2);
    }

    #[test]
    fn vat_and_gross() {
        let base = Money::from_major(1000);
        assert_eq!(base.vat(), Money::from_major(200));
        assert_eq!(base.with_vat().unwrap(), Money::from_major(1200));

        // 0.13 * 0.2 = 0.026 -> 0.03
        let odd = Money::from_minor(13);
        assert_eq!(odd.vat(), Money::from_minor(3));
        assert_eq!(odd.with_vat().unwrap(), Money::from_minor(16));

        // 0.12 * 0.2 = 0.024 -> 0.02
        assert_eq!(Money::from_minor(12).vat(), Money::from_minor(2));
    }

    #[test]
    fn gross_matches_rounded_product() {
        for minor in [0i64, 1, 2, 3, 7, 99, 101, 12_345, 999_999] {
            let base = Money::from_minor(minor);
            let expected = div_round_half_even(i128::from(minor) * 12, 10) as i64;
            assert_eq!(base.with_vat().unwrap().minor(), expected, "base {minor}");
        }
    }

    #[test]
    fn parse_and_display() {
        assert_eq!("1250.40".parse::<Money>().unwrap(), Money::from_minor(125_040));
        assert_eq!("1250.4".parse::<Money>().unwrap(), Money::from_minor(125_040));
        assert_eq!("3".parse::<Money>().unwrap(), Money::from_major(3));
        assert_eq!("-0.05".parse::<Money>().unwrap(), Money::from_minor(-5));
        assert_eq!(Money::from_minor(125_040).to_string(), "1250.40");
        assert_eq!(Money::from_minor(-5).to_string(), "-0.05");
        for bad in ["", ".5", "1.", "1.234", "1,00", "abc", "--1"] {
            assert!(bad.parse::<Money>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn per_unit_rounds() {
        assert_eq!(Money::from_minor(1000).per_unit(3), Money::from_minor(333));
        assert_eq!(Money::from_minor(1000).per_unit(0), Money::ZERO);
        assert_eq!(Money::from_minor(5).per_unit(2), Money::from_minor(2));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_decimal_string() {
        let m: Money = serde_json::from_str("\"19.99\"").unwrap();
        assert_eq!(m, Money::from_minor(1999));
        assert_eq!(serde_json::to_string(&m).unwrap(), "\"19.99\"");
        assert!(serde_json::from_str::<Money>("1999").is_err());
    }
}
