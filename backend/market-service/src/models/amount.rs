//! Fixed-point monetary amounts
//!
//! Prices and accrued costs are stored as integer ten-thousandths, matching
//! the `decimal(10,4)` columns of the upstream schema. Floating point is
//! never used for money.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of fractional decimal digits carried by [`Amount`].
pub const AMOUNT_SCALE: u32 = 4;

const SCALE_FACTOR: u128 = 10u128.pow(AMOUNT_SCALE);

/// A non-negative monetary amount with four fractional decimal digits.
///
/// Serializes as a decimal string (`"0.0500"`), the same shape the original
/// JSON API used for prices, costs and balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Build from raw ten-thousandths.
    pub const fn from_raw(raw: u128) -> Self {
        Amount(raw)
    }

    /// Build from a whole number of currency units.
    pub const fn from_units(units: u64) -> Self {
        Amount(units as u128 * SCALE_FACTOR)
    }

    /// Raw value in ten-thousandths.
    pub const fn raw(self) -> u128 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    pub fn saturating_add(self, other: Amount) -> Amount {
        Amount(self.0.saturating_add(other.0))
    }

    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    pub fn saturating_sub(self, other: Amount) -> Amount {
        Amount(self.0.saturating_sub(other.0))
    }

    /// Multiply a per-unit rate by a unit count (e.g. price-per-minute by
    /// elapsed minutes). Saturates at the representable maximum.
    pub fn saturating_mul(self, count: u64) -> Amount {
        Amount(self.0.saturating_mul(count as u128))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:04}", self.0 / SCALE_FACTOR, self.0 % SCALE_FACTOR)
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> String {
        amount.to_string()
    }
}

/// Error produced when parsing a decimal string into an [`Amount`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAmountError(String);

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid amount: {}", self.0)
    }
}

impl std::error::Error for ParseAmountError {}

impl FromStr for Amount {
    type Err = ParseAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseAmountError("empty string".into()));
        }

        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };

        if frac.len() as u32 > AMOUNT_SCALE {
            return Err(ParseAmountError(format!(
                "{s:?} has more than {AMOUNT_SCALE} fractional digits"
            )));
        }
        if whole.is_empty() && frac.is_empty() {
            return Err(ParseAmountError(format!("{s:?} has no digits")));
        }
        // u128::from_str tolerates a leading `+`; only bare digits are valid
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseAmountError(format!("{s:?} is not a decimal number")));
        }

        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| ParseAmountError(format!("{s:?} is not a decimal number")))?
        };

        let mut frac_raw: u128 = 0;
        if !frac.is_empty() {
            let parsed: u128 = frac
                .parse()
                .map_err(|_| ParseAmountError(format!("{s:?} is not a decimal number")))?;
            frac_raw = parsed * 10u128.pow(AMOUNT_SCALE - frac.len() as u32);
        }

        whole
            .checked_mul(SCALE_FACTOR)
            .and_then(|w| w.checked_add(frac_raw))
            .map(Amount)
            .ok_or_else(|| ParseAmountError(format!("{s:?} is out of range")))
    }
}

impl TryFrom<String> for Amount {
    type Error = ParseAmountError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
