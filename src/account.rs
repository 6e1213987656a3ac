//! Bank account record parsed from one line of text.
//!
//! Lines have exactly four comma-separated fields in fixed order:
//! `branch,number,balance,holder`.

use crate::decimal::Balance;
use crate::error::{BankIoError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Field delimiter of the record format.
pub const DELIMITER: char = ',';

/// Number of fields on every record line.
pub const FIELD_COUNT: usize = 4;

/// A checking account as stored in the record file.
///
/// Field order matches the on-disk column order, which the CSV writer
/// relies on when serializing without headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    /// Branch identifier.
    pub branch: i32,

    /// Account number within the branch.
    pub number: i32,

    /// Current balance.
    pub balance: Balance,

    /// Name of the account holder, exactly as written in the file.
    pub holder: String,
}

impl Account {
    /// Creates an account record.
    pub fn new(branch: i32, number: i32, balance: Balance, holder: impl Into<String>) -> Self {
        Account {
            branch,
            number,
            balance,
            holder: holder.into(),
        }
    }

    /// Parses one decoded line into an account.
    ///
    /// Fails with `MalformedRecord` (line 0) if the field count is not 4 or
    /// a numeric field does not parse. Callers that track line numbers
    /// should use [`Account::parse_numbered`].
    pub fn parse_line(line: &str) -> Result<Self> {
        Self::parse_numbered(line, 0)
    }

    /// Parses one decoded line, reporting `line_no` in any error.
    pub fn parse_numbered(line: &str, line_no: usize) -> Result<Self> {
        let fields: Vec<&str> = line.split(DELIMITER).collect();
        if fields.len() != FIELD_COUNT {
            return Err(BankIoError::malformed(
                line_no,
                format!("expected {} fields, found {}", FIELD_COUNT, fields.len()),
            ));
        }

        let branch = fields[0].trim().parse::<i32>().map_err(|e| {
            BankIoError::malformed(line_no, format!("branch '{}': {}", fields[0], e))
        })?;
        let number = fields[1].trim().parse::<i32>().map_err(|e| {
            BankIoError::malformed(line_no, format!("account number '{}': {}", fields[1], e))
        })?;
        let balance = Balance::from_str(fields[2]).map_err(|e| {
            BankIoError::malformed(line_no, format!("balance '{}': {}", fields[2], e))
        })?;

        Ok(Account::new(branch, number, balance, fields[3]))
    }

    /// Serializes the account back into the record format (no line terminator).
    pub fn to_line(&self) -> String {
        format!(
            "{}{d}{}{d}{}{d}{}",
            self.branch,
            self.number,
            self.balance,
            self.holder,
            d = DELIMITER
        )
    }

    /// Returns `true` if the holder name can be written and read back
    /// without changing the field count or the line structure.
    pub fn is_serializable(&self) -> bool {
        !self
            .holder
            .contains(|c| c == DELIMITER || c == '\n' || c == '\r')
    }
}

impl FromStr for Account {
    type Err = BankIoError;

    fn from_str(s: &str) -> Result<Self> {
        Account::parse_line(s)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} : account {}, branch {}, balance {}",
            self.holder, self.number, self.branch, self.balance
        )
    }
}
