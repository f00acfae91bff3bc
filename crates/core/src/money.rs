//! Monetary amounts with fixed two-digit precision.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A non-negative monetary amount, normalized to two fractional digits.
///
/// Prices persist as `decimal(15,2)` and must survive the round trip without
/// drift, so construction rounds half-up to two digits and rejects negative
/// amounts. Deserialization funnels through [`Money::new`], so wire input
/// obeys the same rules as constructed values. Arithmetic is checked;
/// overflow surfaces as `None` instead of wrapping.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Build an amount from a decimal value.
    ///
    /// Rounds to two fractional digits (half-up, away from zero) and rejects
    /// negative input.
    pub fn new(amount: Decimal) -> DomainResult<Self> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DomainError::validation(format!(
                "monetary amount cannot be negative: {amount}"
            )));
        }
        let mut normalized =
            amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        // round_dp only ever drops digits; rescale pads "10" out to "10.00".
        normalized.rescale(2);
        Ok(Self(normalized))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a line quantity. `None` on overflow.
    pub fn checked_mul(&self, quantity: u32) -> Option<Money> {
        self.0.checked_mul(Decimal::from(quantity)).map(Money)
    }

    /// Add another amount. `None` on overflow.
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = DomainError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Money::new(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn construction_normalizes_to_two_fractional_digits() {
        let m = Money::new(dec!(10)).unwrap();
        assert_eq!(m.amount(), dec!(10.00));
        assert_eq!(m.to_string(), "10.00");

        let rounded_up = Money::new(dec!(3.005)).unwrap();
        assert_eq!(rounded_up.amount(), dec!(3.01));

        let rounded_down = Money::new(dec!(3.004)).unwrap();
        assert_eq!(rounded_down.amount(), dec!(3.00));
    }

    #[test]
    fn construction_rejects_negative_amounts() {
        let err = Money::new(dec!(-0.01)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn negative_zero_is_accepted_as_zero() {
        let m = Money::new(dec!(-0.00)).unwrap();
        assert_eq!(m, Money::ZERO);
    }

    #[test]
    fn checked_mul_scales_by_quantity() {
        let unit = Money::new(dec!(10.00)).unwrap();
        let total = unit.checked_mul(3).unwrap();
        assert_eq!(total.amount(), dec!(30.00));
    }

    #[test]
    fn checked_mul_reports_overflow() {
        let huge = Money::new(Decimal::MAX.round_dp(2)).unwrap();
        assert!(huge.checked_mul(u32::MAX).is_none());
    }

    #[test]
    fn checked_add_sums_amounts() {
        let a = Money::new(dec!(1.25)).unwrap();
        let b = Money::new(dec!(2.75)).unwrap();
        assert_eq!(a.checked_add(b).unwrap().amount(), dec!(4.00));
    }

    #[test]
    fn deserialization_rejects_negative_amounts() {
        let result: Result<Money, _> = serde_json::from_str(r#""-1""#);
        assert!(result.is_err());
    }

    #[test]
    fn deserialization_normalizes_like_construction() {
        let money: Money = serde_json::from_str(r#""10.005""#).unwrap();
        assert_eq!(money, Money::new(dec!(10.01)).unwrap());
        assert_eq!(money.to_string(), "10.01");
    }

    #[test]
    fn serialization_round_trips() {
        let money = Money::new(dec!(4.20)).unwrap();
        let json = serde_json::to_string(&money).unwrap();
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, money);
    }
}
