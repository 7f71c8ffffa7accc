use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::op;

pub const NAIRA_CURRENCY_CODE: &str = "NGN";
pub const NAIRA_CURRENCY_CODE_LOWER: &str = "ngn";

const MINOR_UNITS_PER_MAJOR: f64 = 100.0;

//--------------------------------------     Kobo       --------------------------------------------------------------
/// An amount of money in minor currency units (kobo for NGN, cents for USD, and so on).
///
/// The payment provider deals exclusively in minor units, so caller-supplied major-unit amounts are converted
/// exactly once, through [`Kobo::from_major`], at the boundary where a provider request is built.
#[derive(Debug, Clone, Copy, Default, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kobo(i64);

op!(binary Kobo, Add, add);
op!(binary Kobo, Sub, sub);
op!(inplace Kobo, SubAssign, sub_assign);
op!(unary Kobo, Neg, neg);

impl Mul<i64> for Kobo {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self::from(self.value() * rhs)
    }
}

impl Sum for Kobo {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in kobo: {0}")]
pub struct KoboConversionError(String);

impl From<i64> for Kobo {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for Kobo {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Kobo {}

impl Display for Kobo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.abs() < 10_000 {
            write!(f, "{}k", self.0)
        } else {
            let major = self.0 as f64 / MINOR_UNITS_PER_MAJOR;
            write!(f, "₦{major:0.2}")
        }
    }
}

impl Kobo {
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Convert a major-unit amount into kobo, rounding to the nearest whole kobo.
    ///
    /// The scaling happens here and nowhere else, so `10.00` major units always becomes `1000` kobo and an
    /// already-converted amount can never be scaled a second time.
    pub fn from_major(amount: f64) -> Result<Self, KoboConversionError> {
        if !amount.is_finite() {
            return Err(KoboConversionError(format!("{amount} is not a finite amount")));
        }
        let minor = (amount * MINOR_UNITS_PER_MAJOR).round();
        if minor.abs() >= i64::MAX as f64 {
            return Err(KoboConversionError(format!("{amount} is too large to convert to kobo")));
        }
        Ok(Self(minor as i64))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn major_amounts_are_scaled_by_one_hundred() {
        assert_eq!(Kobo::from_major(10.00).unwrap(), Kobo::from(1000));
        assert_eq!(Kobo::from_major(0.01).unwrap(), Kobo::from(1));
        assert_eq!(Kobo::from_major(2500.50).unwrap(), Kobo::from(250_050));
        assert_eq!(Kobo::from_major(0.0).unwrap(), Kobo::from(0));
    }

    #[test]
    fn fractional_kobo_rounds_to_the_nearest_whole_unit() {
        assert_eq!(Kobo::from_major(0.015).unwrap(), Kobo::from(2));
        assert_eq!(Kobo::from_major(99.999).unwrap(), Kobo::from(10_000));
    }

    #[test]
    fn non_finite_amounts_are_rejected() {
        assert!(Kobo::from_major(f64::NAN).is_err());
        assert!(Kobo::from_major(f64::INFINITY).is_err());
        assert!(Kobo::from_major(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn oversized_amounts_are_rejected() {
        assert!(Kobo::from_major(1e20).is_err());
    }

    #[test]
    fn display_small_amounts_in_kobo_and_large_in_naira() {
        assert_eq!(Kobo::from(150).to_string(), "150k");
        assert_eq!(Kobo::from(250_050).to_string(), "₦2500.50");
    }

    #[test]
    fn arithmetic_on_amounts() {
        let total: Kobo = [Kobo::from(100), Kobo::from(250)].into_iter().sum();
        assert_eq!(total, Kobo::from(350));
        assert_eq!(Kobo::from(500) - Kobo::from(200), Kobo::from(300));
        assert_eq!(Kobo::from(50) * 3, Kobo::from(150));
    }
}
