//! Monetary amounts in Brazilian reais, using decimal arithmetic.
//!
//! All currency math in Forneria goes through [`Money`]; floats never touch
//! totals. Amounts parse from and render to pt-BR formatting ("R$ 1.234,56"),
//! which is what the menu backend emits and what customers see.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing [`Money`] from text.
#[derive(thiserror::Error, Debug, Clone)]
pub enum MoneyError {
    /// The input did not contain a readable amount.
    #[error("could not parse money amount from {input:?}")]
    Unparseable {
        /// The offending input.
        input: String,
    },
}

/// An amount of Brazilian reais.
///
/// ## Examples
///
/// ```
/// use forneria_core::Money;
///
/// let price = Money::parse_brl("R$ 59,90").unwrap();
/// assert_eq!(price.display_brl(), "R$ 59,90");
///
/// let big = Money::parse_brl("1.234,56").unwrap();
/// assert_eq!(big.display_brl(), "R$ 1.234,56");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero reais.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create from a decimal amount of reais.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create from a whole number of reais.
    #[must_use]
    pub fn from_reais(reais: i64) -> Self {
        Self(Decimal::new(reais, 0))
    }

    /// Create from a number of centavos.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Parse a pt-BR formatted amount.
    ///
    /// Accepts an optional `R$` prefix and grouping dots; when a comma is
    /// present it is the decimal separator and dots are grouping ("1.234,56").
    /// Without a comma the text is read as a plain decimal ("59.90", "3").
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::Unparseable`] when no amount can be read.
    pub fn parse_brl(input: &str) -> Result<Self, MoneyError> {
        let cleaned: String = input
            .replace("R$", "")
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        let normalized = if cleaned.contains(',') {
            cleaned.replace('.', "").replace(',', ".")
        } else {
            cleaned
        };

        Decimal::from_str(&normalized)
            .map(Self)
            .map_err(|_| MoneyError::Unparseable {
                input: input.to_owned(),
            })
    }

    /// The underlying decimal amount in reais.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether this amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Subtract, clamping at zero. Discounts never drive a total negative.
    #[must_use]
    pub fn saturating_sub(self, other: Self) -> Self {
        let result = self.0 - other.0;
        if result.is_sign_negative() {
            Self::ZERO
        } else {
            Self(result)
        }
    }

    /// The given percentage of this amount, rounded to centavos.
    #[must_use]
    pub fn percentage(self, percent: Decimal) -> Self {
        Self((self.0 * percent / Decimal::ONE_HUNDRED).round_dp(2))
    }

    /// Render as pt-BR currency text, e.g. "R$ 1.234,56".
    #[must_use]
    pub fn display_brl(&self) -> String {
        let rounded = self.0.round_dp(2).abs();
        let text = format!("{rounded:.2}");
        let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        let len = int_part.len();
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        let sign = if self.0.is_sign_negative() && !self.0.is_zero() {
            "-"
        } else {
            ""
        };
        format!("R$ {sign}{grouped},{frac_part}")
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_brl())
    }
}
