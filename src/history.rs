//! Caller-owned store of past determinations.
//!
//! The engine only reads from a history. Callers append each checkpoint's
//! [`Evaluation`] once the checkpoint is complete and persist the history
//! however they like between runs.

use crate::context::Month;
use crate::engine::Evaluation;
use crate::money::Money;
use crate::record::{ActualDefaulterRecord, ChargeRecord, ProbableDefaulterRecord};
use serde::{Deserialize, Serialize};

/// Append-only collection of probable, actual and charge records for all
/// accounts across all months.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeterminationHistory {
    probable: Vec<ProbableDefaulterRecord>,
    actual: Vec<ActualDefaulterRecord>,
    charges: Vec<ChargeRecord>,
}

impl DeterminationHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a history from previously persisted records.
    pub fn from_records(
        probable: Vec<ProbableDefaulterRecord>,
        actual: Vec<ActualDefaulterRecord>,
        charges: Vec<ChargeRecord>,
    ) -> Self {
        DeterminationHistory {
            probable,
            actual,
            charges,
        }
    }

    /// Appends one checkpoint's output.
    pub fn append(&mut self, evaluation: Evaluation) {
        self.probable.extend(evaluation.probable);
        self.actual.extend(evaluation.actual);
        self.charges.extend(evaluation.charges);
    }

    pub fn has_probable(&self, account_id: &str, month: Month) -> bool {
        self.probable
            .iter()
            .any(|r| r.account_id == account_id && r.month == month)
    }

    pub fn has_actual(&self, account_id: &str, month: Month) -> bool {
        self.find_actual(account_id, month).is_some()
    }

    pub fn find_actual(&self, account_id: &str, month: Month) -> Option<&ActualDefaulterRecord> {
        self.actual
            .iter()
            .find(|r| r.account_id == account_id && r.month == month)
    }

    /// Returns `true` if an existing charge for the account already covers
    /// `month`. A month is charged at most once.
    pub fn charge_covers_month(&self, account_id: &str, month: Month) -> bool {
        self.charges
            .iter()
            .any(|c| c.account_id == account_id && c.covers(month))
    }

    pub fn probable(&self) -> &[ProbableDefaulterRecord] {
        &self.probable
    }

    pub fn actual(&self) -> &[ActualDefaulterRecord] {
        &self.actual
    }

    pub fn charges(&self) -> &[ChargeRecord] {
        &self.charges
    }

    /// Sum of all charges assessed against one account.
    pub fn total_charged(&self, account_id: &str) -> Money {
        self.charges
            .iter()
            .filter(|c| c.account_id == account_id)
            .map(|c| c.total_charge)
            .sum()
    }

    /// Returns `true` if no record of any kind has been stored.
    pub fn is_empty(&self) -> bool {
        self.probable.is_empty() && self.actual.is_empty() && self.charges.is_empty()
    }
}
