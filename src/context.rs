//! Per-checkpoint evaluation context.

use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Month counter. The epoch is chosen by the caller; only differences matter.
pub type Month = i32;

/// Where in the monthly cycle an evaluation takes place.
///
/// `check_day` selects the rule group: the probable checkpoint (day 25 by
/// default) or the actual/charge checkpoint (day 3 of the month after the one
/// being confirmed). See [`RuleConfig`](crate::config::RuleConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionContext {
    pub current_month: Month,
    pub check_day: u32,
    /// Required average balance.
    pub min_balance: Money,
}

impl ExecutionContext {
    pub fn new(current_month: Month, check_day: u32, min_balance: Money) -> Self {
        ExecutionContext {
            current_month,
            check_day,
            min_balance,
        }
    }

    /// Chronological position of this checkpoint.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            month: self.current_month,
            day: self.check_day,
        }
    }
}

/// A (month, day) evaluation point. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Checkpoint {
    pub month: Month,
    pub day: u32,
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "month {} day {}", self.month, self.day)
    }
}
