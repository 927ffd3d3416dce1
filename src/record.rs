//! Determination records produced by the decision rules.
//!
//! Records are immutable once created. Callers persist them between
//! checkpoints and hand them back through
//! [`DeterminationHistory`](crate::history::DeterminationHistory).

use crate::context::Month;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// An account flagged on the probable checkpoint because its partial-month
/// AMB (days 1-25, divided by 30) is below the minimum.
///
/// At most one record exists per `(account_id, month)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbableDefaulterRecord {
    pub account_id: String,
    pub month: Month,

    /// The partial-month AMB that triggered the flag.
    pub amb: Money,

    /// Whether the customer gets a warning SMS. Continuing defaulters do not.
    pub sms_sent: bool,

    pub reason: String,
}

/// A confirmed default for a whole month.
///
/// Created on the actual checkpoint of the month *after* `month`, and only
/// for accounts that were flagged probable for `month`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActualDefaulterRecord {
    pub account_id: String,

    /// The defaulted month (one before the evaluating checkpoint's month).
    pub month: Month,

    /// Full-month AMB of the defaulted month.
    pub amb: Money,

    /// `min_balance - amb`. Always positive.
    pub shortfall: Money,

    pub status: String,
}

/// Non-maintenance charge for two consecutive confirmed defaults.
///
/// # Invariants
///
/// - `month2 == month1 + 1`
/// - `total_charge == base_charge + gst_amount`
/// - No two charges for one account cover a common month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeRecord {
    pub account_id: String,
    pub month1: Month,
    pub month2: Month,
    pub shortfall1: Money,
    pub shortfall2: Money,
    pub total_shortfall: Money,

    /// Sum of both months' capped base charges.
    pub base_charge: Money,

    /// Sum of both months' GST.
    pub gst_amount: Money,

    pub total_charge: Money,

    /// Month in which the charge was assessed (`month2 + 1`).
    pub charged_in_month: Month,

    pub reason: String,
}

impl ChargeRecord {
    /// The two months this charge covers.
    pub fn months(&self) -> [Month; 2] {
        [self.month1, self.month2]
    }

    /// Returns `true` if this charge covers `month`.
    pub fn covers(&self, month: Month) -> bool {
        self.month1 == month || self.month2 == month
    }
}

/// One month's share of a charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyCharge {
    pub base: Money,
    pub gst: Money,
}

impl MonthlyCharge {
    pub fn subtotal(&self) -> Money {
        self.base + self.gst
    }
}
