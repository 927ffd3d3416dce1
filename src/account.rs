//! Monthly balance ledger for a single account.
//!
//! Averages are always taken over a fixed 30-day cycle: a range that ends
//! before day 30 treats the remaining days as zero balance.

use crate::money::Money;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of days in one balance cycle. Also the AMB divisor.
pub const DAYS_IN_CYCLE: usize = 30;

/// One account's daily balances for one month.
///
/// # Degraded Data
///
/// A ledger with fewer than [`DAYS_IN_CYCLE`] balances, with any negative
/// balance, or whose balances are too large to sum, is considered malformed. Its AMB is reported as zero rather than
/// failing, which the rules treat as a maximal default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Stable account identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Balances for days 1..=30, stored at index `day - 1`.
    pub daily_balances: Vec<Money>,
}

impl Account {
    /// Creates an account with the given month of balances.
    pub fn new(id: impl Into<String>, name: impl Into<String>, daily_balances: Vec<Money>) -> Self {
        Account {
            id: id.into(),
            name: name.into(),
            daily_balances,
        }
    }

    /// Creates an account whose balance is `amount` on every day of the cycle.
    pub fn with_constant_balance(
        id: impl Into<String>,
        name: impl Into<String>,
        amount: Money,
    ) -> Self {
        Self::new(id, name, vec![amount; DAYS_IN_CYCLE])
    }

    /// Swaps in a new month of balances. The previous month is discarded.
    pub fn replace_balances(&mut self, daily_balances: Vec<Money>) {
        self.daily_balances = daily_balances;
    }

    /// Returns `true` if the ledger holds a usable month of balances.
    pub fn is_complete(&self) -> bool {
        self.daily_balances.len() >= DAYS_IN_CYCLE
            && !self.daily_balances.iter().any(Money::is_negative)
    }

    /// Calculates the Average Monthly Balance over `start_day..=end_day`.
    ///
    /// Days are 1-indexed and clamped to the cycle. The sum is always divided
    /// by 30, not by the number of days in the range, so
    /// `calculate_amb(1, 25)` is a projection that counts days 26-30 as zero.
    pub fn calculate_amb(&self, start_day: usize, end_day: usize) -> Money {
        if !self.is_complete() {
            debug!(
                "Account {}: malformed ledger ({} balances), AMB defaults to zero",
                self.id,
                self.daily_balances.len()
            );
            return Money::ZERO;
        }

        let start = start_day.max(1);
        let end = end_day.min(DAYS_IN_CYCLE);
        if start > end {
            return Money::ZERO;
        }

        let sum = self.daily_balances[start - 1..end]
            .iter()
            .try_fold(Money::ZERO, |acc, balance| acc.checked_add(*balance));

        match sum {
            Some(sum) => Money::new(sum.amount() / Decimal::from(DAYS_IN_CYCLE as u64)),
            None => {
                debug!(
                    "Account {}: balances overflow the sum, AMB defaults to zero",
                    self.id
                );
                Money::ZERO
            }
        }
    }
}
