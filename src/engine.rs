//! Decision rules for balance defaulters and non-maintenance charges.
//!
//! The engine is a pure function of an account's ledger, the checkpoint
//! context and a read-only history snapshot. Rules run in a fixed order:
//!
//! 1. **Probable** (probable checkpoint): flag accounts whose partial-month
//!    AMB is below the minimum.
//! 2. **Actual** (actual checkpoint): confirm last month's probable flag when
//!    the full-month AMB is also below the minimum.
//! 3. **Charge** (actual checkpoint, after rule 2): charge two consecutive
//!    confirmed months that have not been charged yet.
//!
//! Every rule is guarded so that re-running a checkpoint produces nothing new.

use crate::account::{Account, DAYS_IN_CYCLE};
use crate::config::RuleConfig;
use crate::context::{ExecutionContext, Month};
use crate::history::DeterminationHistory;
use crate::money::Money;
use crate::record::{ActualDefaulterRecord, ChargeRecord, MonthlyCharge, ProbableDefaulterRecord};
use log::debug;
use serde::Serialize;

/// Last day counted by the partial-month projection.
pub const PROBABLE_AMB_END_DAY: usize = 25;

/// Records newly derived at one checkpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Evaluation {
    pub probable: Vec<ProbableDefaulterRecord>,
    pub actual: Vec<ActualDefaulterRecord>,
    pub charges: Vec<ChargeRecord>,
}

impl Evaluation {
    /// Number of rule firings, one per record produced.
    pub fn rules_fired(&self) -> usize {
        self.probable.len() + self.actual.len() + self.charges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules_fired() == 0
    }

    /// Moves all records of `other` into `self`.
    pub fn merge(&mut self, other: Evaluation) {
        self.probable.extend(other.probable);
        self.actual.extend(other.actual);
        self.charges.extend(other.charges);
    }
}

/// Stateless rule evaluator.
///
/// Holds only configuration; all state lives in the caller's
/// [`DeterminationHistory`].
#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    config: RuleConfig,
}

impl DecisionEngine {
    pub fn new(config: RuleConfig) -> Self {
        DecisionEngine { config }
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// Evaluates all rules for one account at one checkpoint.
    ///
    /// On the actual checkpoint `account` must hold the balances of the month
    /// being confirmed (`current_month - 1`), not the new month.
    pub fn evaluate(
        &self,
        account: &Account,
        context: &ExecutionContext,
        history: &DeterminationHistory,
    ) -> Evaluation {
        let mut evaluation = Evaluation::default();

        if context.check_day == self.config.probable_check_day {
            if let Some(record) = self.probable_rule(account, context, history) {
                evaluation.probable.push(record);
            }
        } else if context.check_day == self.config.actual_check_day {
            if let Some(record) = self.actual_rule(account, context, history) {
                evaluation.actual.push(record);
            }
            if let Some(record) = self.charge_rule(account, context, history, &evaluation.actual) {
                evaluation.charges.push(record);
            }
        } else {
            debug!(
                "Account {}: day {} is not a checkpoint, no rules apply",
                account.id, context.check_day
            );
        }

        evaluation
    }

    fn probable_rule(
        &self,
        account: &Account,
        context: &ExecutionContext,
        history: &DeterminationHistory,
    ) -> Option<ProbableDefaulterRecord> {
        let month = context.current_month;
        let previous = month_before(account, month, 1)?;
        let amb = account.calculate_amb(1, PROBABLE_AMB_END_DAY);

        if amb >= context.min_balance {
            debug!(
                "Account {}: month {} AMB {} maintains minimum {}",
                account.id, month, amb, context.min_balance
            );
            return None;
        }

        if history.has_probable(&account.id, month) {
            debug!(
                "Account {}: already flagged probable for month {}, ignoring",
                account.id, month
            );
            return None;
        }

        let continuing = history.has_actual(&account.id, previous);
        let (sms_sent, reason) = if continuing {
            (false, "continuing defaulter")
        } else {
            (true, "new defaulter")
        };

        debug!(
            "Account {}: probable defaulter for month {} (AMB {}, deficit {}, sms {})",
            account.id,
            month,
            amb,
            context.min_balance - amb,
            sms_sent
        );

        Some(ProbableDefaulterRecord {
            account_id: account.id.clone(),
            month,
            amb,
            sms_sent,
            reason: reason.to_string(),
        })
    }

    fn actual_rule(
        &self,
        account: &Account,
        context: &ExecutionContext,
        history: &DeterminationHistory,
    ) -> Option<ActualDefaulterRecord> {
        let month = month_before(account, context.current_month, 1)?;
        let amb = account.calculate_amb(1, DAYS_IN_CYCLE);

        if amb >= context.min_balance {
            return None;
        }

        if !history.has_probable(&account.id, month) {
            debug!(
                "Account {}: month {} below minimum but never flagged probable, not confirming",
                account.id, month
            );
            return None;
        }

        if history.has_actual(&account.id, month) {
            debug!(
                "Account {}: month {} already confirmed, ignoring",
                account.id, month
            );
            return None;
        }

        let shortfall = context.min_balance - amb;
        debug!(
            "Account {}: confirmed defaulter for month {} (AMB {}, shortfall {})",
            account.id, month, amb, shortfall
        );

        Some(ActualDefaulterRecord {
            account_id: account.id.clone(),
            month,
            amb,
            shortfall,
            status: format!("confirmed actual defaulter for month {}", month),
        })
    }

    fn charge_rule(
        &self,
        account: &Account,
        context: &ExecutionContext,
        history: &DeterminationHistory,
        confirmed_now: &[ActualDefaulterRecord],
    ) -> Option<ChargeRecord> {
        let month1 = month_before(account, context.current_month, 2)?;
        let month2 = month1 + 1;

        let first = find_actual(history, confirmed_now, &account.id, month1)?;
        let second = find_actual(history, confirmed_now, &account.id, month2)?;

        if history.charge_covers_month(&account.id, month1)
            || history.charge_covers_month(&account.id, month2)
        {
            debug!(
                "Account {}: months {}+{} overlap an existing charge, ignoring",
                account.id, month1, month2
            );
            return None;
        }

        let charge1 = self.monthly_charge(first.shortfall);
        let charge2 = self.monthly_charge(second.shortfall);

        let record = ChargeRecord {
            account_id: account.id.clone(),
            month1,
            month2,
            shortfall1: first.shortfall,
            shortfall2: second.shortfall,
            total_shortfall: first.shortfall + second.shortfall,
            base_charge: charge1.base + charge2.base,
            gst_amount: charge1.gst + charge2.gst,
            total_charge: charge1.subtotal() + charge2.subtotal(),
            charged_in_month: context.current_month,
            reason: "charged for 2-month consecutive defaults".to_string(),
        };

        debug!(
            "Account {}: charged {} for months {}+{} (base {}, GST {})",
            account.id, record.total_charge, month1, month2, record.base_charge, record.gst_amount
        );

        Some(record)
    }

    /// Capped base charge and GST for one defaulted month.
    pub fn monthly_charge(&self, shortfall: Money) -> MonthlyCharge {
        let base = (shortfall * self.config.charge_rate).min(self.config.charge_cap);
        let gst = base * self.config.gst_rate;
        MonthlyCharge { base, gst }
    }
}

/// The month `offset` months before `month`, if the counter can represent it.
fn month_before(account: &Account, month: Month, offset: Month) -> Option<Month> {
    let earlier = month.checked_sub(offset);
    if earlier.is_none() {
        debug!(
            "Account {}: month {} has no month {} before it, no rules apply",
            account.id, month, offset
        );
    }
    earlier
}

/// Looks up a confirmed default, including ones produced earlier in the
/// current evaluation.
fn find_actual<'a>(
    history: &'a DeterminationHistory,
    confirmed_now: &'a [ActualDefaulterRecord],
    account_id: &str,
    month: Month,
) -> Option<&'a ActualDefaulterRecord> {
    confirmed_now
        .iter()
        .find(|r| r.account_id == account_id && r.month == month)
        .or_else(|| history.find_actual(account_id, month))
}
