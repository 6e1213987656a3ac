//! Account balances.
//!
//! A [`Balance`] keeps every digit the input had. Input may use either `.`
//! or `,` as the decimal separator; output always uses `.` and shows at
//! least two decimal places.

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::AddAssign;
use std::str::FromStr;

/// The separator understood by the underlying decimal parser.
const PARSER_SEPARATOR: char = '.';

/// Decimal places always shown on output (cents).
const MIN_DISPLAY_SCALE: u32 = 2;

/// A monetary amount.
///
/// Equality is numeric: `4785.4` and `4785.40` compare equal.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use bytebank_io::Balance;
///
/// assert_eq!(Balance::from_str("4785,4").unwrap().to_string(), "4785.40");
/// assert_eq!(Balance::from_str("0.005").unwrap().to_string(), "0.005");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Balance(Decimal);

impl Balance {
    /// Zero value.
    pub const ZERO: Self = Balance(Decimal::ZERO);
}

impl FromStr for Balance {
    type Err = rust_decimal::Error;

    /// Parses a balance, normalizing a decimal comma to the parser's `.`.
    ///
    /// Digit separators (`1_000.50`) are rejected.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.contains('_') {
            return Err(rust_decimal::Error::ErrorString(
                "digit separators are not allowed".to_string(),
            ));
        }
        let normalized = trimmed.replace(',', &PARSER_SEPARATOR.to_string());
        Decimal::from_str(&normalized).map(Balance)
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.scale() < MIN_DISPLAY_SCALE {
            // Widening the scale only appends zeros.
            write!(f, "{:.2}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl AddAssign for Balance {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Serialize for Balance {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
