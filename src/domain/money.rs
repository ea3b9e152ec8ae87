//! Currency amounts stored in minor units
//!
//! A listing price such as `£4.40` is kept as `440` pence plus the currency it
//! was quoted in. Conversion happens on the decimal digits themselves, so no
//! binary floating point error leaks into the stored amount.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use super::value_error::ValueParseError;

static PRICE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([^0-9]+)([0-9]{1,3}(?:,[0-9]{3})+|[0-9]+)(?:\.([0-9]+))?$")
        .expect("price pattern is a valid regex")
});

/// Currencies recognised on listing pages, keyed by their symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Currency {
    Gbp,
    Usd,
    Eur,
    Jpy,
}

impl Currency {
    pub const ALL: [Currency; 4] = [Currency::Gbp, Currency::Usd, Currency::Eur, Currency::Jpy];

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Gbp => "£",
            Self::Usd => "$",
            Self::Eur => "€",
            Self::Jpy => "¥",
        }
    }

    /// ISO 4217 code
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Gbp => "GBP",
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Jpy => "JPY",
        }
    }

    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|currency| currency.symbol() == symbol)
    }

    fn valid_symbols() -> String {
        Self::ALL
            .iter()
            .map(|currency| currency.symbol())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Immutable money value in the currency's smallest unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoneyAmount {
    minor_units: i64,
    currency: Currency,
    minor_units_per_major: i64,
}

impl MoneyAmount {
    /// Pence per pound, cents per dollar.
    pub const DEFAULT_MINOR_UNITS_PER_MAJOR: i64 = 100;

    /// Parse a symbol-prefixed price (`"£4.40"`, `"£1,299.99"`) using 100 minor
    /// units per major unit.
    pub fn parse(price: &str) -> Result<Self, ValueParseError> {
        Self::parse_with_minor_units(price, Self::DEFAULT_MINOR_UNITS_PER_MAJOR)
    }

    /// Parse a symbol-prefixed price with an explicit minor unit ratio.
    ///
    /// The scaled amount is rounded half away from zero: `£4.405` at 100 is 441.
    pub fn parse_with_minor_units(
        price: &str,
        minor_units_per_major: i64,
    ) -> Result<Self, ValueParseError> {
        Self::check_minor_units_per_major(minor_units_per_major)?;

        let captures = PRICE_PATTERN
            .captures(price.trim())
            .ok_or_else(|| ValueParseError::invalid_format("price", price))?;

        let symbol = captures[1].trim();
        let currency = Currency::from_symbol(symbol).ok_or_else(|| {
            ValueParseError::UnknownCurrency {
                symbol: symbol.to_string(),
                valid: Currency::valid_symbols(),
            }
        })?;

        let whole = captures[2].replace(',', "");
        let fraction = captures.get(3).map(|m| m.as_str());
        let minor_units = scale_to_minor_units(&whole, fraction, minor_units_per_major)
            .ok_or_else(|| ValueParseError::invalid_format("price", price))?;

        Ok(Self {
            minor_units,
            currency,
            minor_units_per_major,
        })
    }

    /// Build an amount that is already expressed in minor units.
    pub fn from_minor_units(
        minor_units: i64,
        currency: Currency,
        minor_units_per_major: i64,
    ) -> Result<Self, ValueParseError> {
        Self::check_minor_units_per_major(minor_units_per_major)?;
        Ok(Self {
            minor_units,
            currency,
            minor_units_per_major,
        })
    }

    fn check_minor_units_per_major(minor_units_per_major: i64) -> Result<(), ValueParseError> {
        if minor_units_per_major <= 0 {
            return Err(ValueParseError::InvalidConfiguration {
                message: format!(
                    "minor units per major unit must be a positive integer, got {minor_units_per_major}"
                ),
            });
        }
        Ok(())
    }

    #[must_use]
    pub const fn minor_units(&self) -> i64 {
        self.minor_units
    }

    #[must_use]
    pub const fn minor_units_per_major(&self) -> i64 {
        self.minor_units_per_major
    }

    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        self.currency.symbol()
    }

    /// Value in major units, e.g. `4.4` for 440 pence
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn major_value(&self) -> f64 {
        self.minor_units as f64 / self.minor_units_per_major as f64
    }
}

impl FromStr for MoneyAmount {
    type Err = ValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MoneyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:.2}", self.symbol(), self.major_value())
    }
}

/// `whole.fraction * per_major`, rounded half away from zero.
/// `None` when the result does not fit.
fn scale_to_minor_units(whole: &str, fraction: Option<&str>, per_major: i64) -> Option<i64> {
    let per_major = i128::from(per_major);
    let whole: i128 = whole.parse().ok()?;

    // Long multiplication of the fraction digits by per_major, least significant
    // digit first. `carry` ends as the whole part of the product and `leading`
    // as the first digit of its fractional part.
    let mut carry: i128 = 0;
    let mut leading: i128 = 0;
    for digit in fraction.unwrap_or_default().bytes().rev() {
        let product = i128::from(digit - b'0') * per_major + carry;
        leading = product % 10;
        carry = product / 10;
    }

    let rounded = whole
        .checked_mul(per_major)?
        .checked_add(carry)?
        .checked_add(i128::from(leading >= 5))?;
    i64::try_from(rounded).ok()
}
