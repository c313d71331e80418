//! Type-safe price representation using decimal arithmetic.
//!
//! Prices carry a [`CurrencyCode`] alongside a [`Decimal`] amount. The display
//! form (`"$10.00"`) is only produced and parsed at the edges; everything in
//! between works on the typed value.

use core::fmt;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::quantity::Quantity;

/// Number of decimal places shown for currency amounts.
const DISPLAY_DECIMAL_PLACES: u32 = 2;

/// Errors that can occur when parsing or combining a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty.
    #[error("price cannot be empty")]
    Empty,
    /// The input does not start with the expected currency symbol.
    #[error("price must start with {expected}")]
    MissingSymbol {
        /// Symbol for the expected currency.
        expected: &'static str,
    },
    /// The amount after the symbol is not a decimal number.
    #[error("invalid price amount: {0}")]
    InvalidAmount(String),
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// Two prices in different currencies were combined.
    #[error("currency mismatch: {left} vs {right}")]
    CurrencyMismatch {
        /// Currency of the left operand.
        left: CurrencyCode,
        /// Currency of the right operand.
        right: CurrencyCode,
    },
    /// The result does not fit in a decimal.
    #[error("price arithmetic overflowed")]
    Overflow,
    /// The currency code is not supported.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// A price with currency information. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPrice")]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    amount: Decimal,
    /// ISO 4217 currency code.
    currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal, currency_code: CurrencyCode) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self {
            amount,
            currency_code,
        })
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency_code,
        }
    }

    /// Parse a display string such as `"$10.00"`.
    ///
    /// The leading currency symbol must match `currency_code`; the remainder
    /// must be a non-negative decimal number.
    ///
    /// # Errors
    ///
    /// Returns a [`PriceError`] describing why the input was rejected.
    pub fn parse(input: &str, currency_code: CurrencyCode) -> Result<Self, PriceError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(PriceError::Empty);
        }

        let symbol = currency_code.symbol();
        let amount = input
            .strip_prefix(symbol)
            .ok_or(PriceError::MissingSymbol { expected: symbol })?
            .trim();

        let amount = Decimal::from_str(amount)
            .map_err(|_| PriceError::InvalidAmount(amount.to_string()))?;

        Self::new(amount, currency_code)
    }

    /// The exact amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// The currency of this price.
    #[must_use]
    pub const fn currency_code(&self) -> CurrencyCode {
        self.currency_code
    }

    /// This price rounded to two decimal places, half away from zero.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            amount: self.amount.round_dp_with_strategy(
                DISPLAY_DECIMAL_PLACES,
                RoundingStrategy::MidpointAwayFromZero,
            ),
            currency_code: self.currency_code,
        }
    }

    /// Multiply by a line quantity.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Overflow`] if the product does not fit.
    pub fn times(&self, quantity: Quantity) -> Result<Self, PriceError> {
        let amount = self
            .amount
            .checked_mul(Decimal::from(quantity.get()))
            .ok_or(PriceError::Overflow)?;
        Ok(Self {
            amount,
            currency_code: self.currency_code,
        })
    }

    /// Add two prices of the same currency.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::CurrencyMismatch`] if the currencies differ, or
    /// [`PriceError::Overflow`] if the sum does not fit.
    pub fn checked_add(&self, other: &Self) -> Result<Self, PriceError> {
        if self.currency_code != other.currency_code {
            return Err(PriceError::CurrencyMismatch {
                left: self.currency_code,
                right: other.currency_code,
            });
        }
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or(PriceError::Overflow)?;
        Ok(Self {
            amount,
            currency_code: self.currency_code,
        })
    }

    /// The amount formatted to two decimal places, without a symbol (`"10.00"`).
    #[must_use]
    pub fn amount_string(&self) -> String {
        format!("{:.2}", self.rounded().amount)
    }

    /// Format for display (e.g., `"$10.00"`).
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{}", self.currency_code.symbol(), self.amount_string())
    }
}

/// Unvalidated wire form of [`Price`]; deserialization goes through [`Price::new`].
#[derive(Deserialize)]
struct RawPrice {
    amount: Decimal,
    currency_code: CurrencyCode,
}

impl TryFrom<RawPrice> for Price {
    type Error = PriceError;

    fn try_from(raw: RawPrice) -> Result<Self, Self::Error> {
        Self::new(raw.amount, raw.currency_code)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// The symbol shown before amounts.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// The three-letter ISO code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            _ => Err(PriceError::UnknownCurrency(s.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn usd(s: &str) -> Price {
        Price::parse(s, CurrencyCode::USD).unwrap()
    }

    fn qty(n: u32) -> Quantity {
        Quantity::new(n).unwrap()
    }

    #[test]
    fn test_parse_valid() {
        assert_eq!(usd("$10.00").amount(), Decimal::new(1000, 2));
        assert_eq!(usd("$3.5").amount(), Decimal::new(35, 1));
        assert_eq!(usd(" $15 ").amount(), Decimal::from(15));
        assert_eq!(usd("$0.00").amount(), Decimal::ZERO);
    }

    #[test]
    fn test_parse_non_dollar_symbol() {
        let price = Price::parse("€12.50", CurrencyCode::EUR).unwrap();
        assert_eq!(price.display(), "€12.50");
        let price = Price::parse("£4", CurrencyCode::GBP).unwrap();
        assert_eq!(price.display(), "£4.00");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Price::parse("", CurrencyCode::USD), Err(PriceError::Empty));
        assert_eq!(Price::parse("   ", CurrencyCode::USD), Err(PriceError::Empty));
    }

    #[test]
    fn test_parse_missing_symbol() {
        assert!(matches!(
            Price::parse("10.00", CurrencyCode::USD),
            Err(PriceError::MissingSymbol { expected: "$" })
        ));
        assert!(matches!(
            Price::parse("$10.00", CurrencyCode::EUR),
            Err(PriceError::MissingSymbol { .. })
        ));
    }

    #[test]
    fn test_parse_invalid_amount() {
        assert!(matches!(
            Price::parse("$ten", CurrencyCode::USD),
            Err(PriceError::InvalidAmount(_))
        ));
        assert!(matches!(
            Price::parse("$", CurrencyCode::USD),
            Err(PriceError::InvalidAmount(_))
        ));
        assert!(matches!(
            Price::parse("$1.2.3", CurrencyCode::USD),
            Err(PriceError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_parse_negative() {
        assert_eq!(
            Price::parse("$-1.00", CurrencyCode::USD),
            Err(PriceError::Negative)
        );
    }

    #[test]
    fn test_display_two_decimal_places() {
        assert_eq!(usd("$10").display(), "$10.00");
        assert_eq!(usd("$3.5").amount_string(), "3.50");
        assert_eq!(usd("$0.125").amount_string(), "0.13");
        assert_eq!(usd("$0.124").amount_string(), "0.12");
        assert_eq!(usd("$2.50").to_string(), "$2.50");
    }

    #[test]
    fn test_deserialize_checks_sign() {
        let price: Price =
            serde_json::from_str(r#"{"amount":"19.99","currency_code":"USD"}"#).unwrap();
        assert_eq!(price.display(), "$19.99");

        let err = serde_json::from_str::<Price>(r#"{"amount":"-5.00","currency_code":"USD"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("price cannot be negative"));
    }

    #[test]
    fn test_times_quantity() {
        assert_eq!(usd("$5.00").times(qty(2)).unwrap().amount_string(), "10.00");
        assert_eq!(usd("$3.50").times(qty(3)).unwrap().amount_string(), "10.50");
    }

    #[test]
    fn test_times_overflow() {
        let huge = Price::new(Decimal::MAX, CurrencyCode::USD).unwrap();
        assert_eq!(huge.times(qty(2)), Err(PriceError::Overflow));
    }

    #[test]
    fn test_checked_add() {
        let sum = usd("$5.00").checked_add(&usd("$3.50")).unwrap();
        assert_eq!(sum.amount_string(), "8.50");
    }

    #[test]
    fn test_checked_add_currency_mismatch() {
        let eur = Price::parse("€1.00", CurrencyCode::EUR).unwrap();
        assert_eq!(
            usd("$1.00").checked_add(&eur),
            Err(PriceError::CurrencyMismatch {
                left: CurrencyCode::USD,
                right: CurrencyCode::EUR,
            })
        );
    }

    #[test]
    fn test_currency_code_from_str() {
        assert_eq!("usd".parse::<CurrencyCode>().unwrap(), CurrencyCode::USD);
        assert_eq!(" GBP ".parse::<CurrencyCode>().unwrap(), CurrencyCode::GBP);
        assert!(matches!(
            "XYZ".parse::<CurrencyCode>(),
            Err(PriceError::UnknownCurrency(_))
        ));
    }

    #[test]
    fn test_currency_symbols() {
        assert_eq!(CurrencyCode::USD.symbol(), "$");
        assert_eq!(CurrencyCode::CAD.symbol(), "$");
        assert_eq!(CurrencyCode::EUR.symbol(), "€");
        assert_eq!(CurrencyCode::GBP.code(), "GBP");
    }
}
