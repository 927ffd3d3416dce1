//! Built-in demonstration scenarios.
//!
//! Each scenario follows one customer through a number of monthly cycles
//! with a fixed balance plan and reports the resulting determinations.

use crate::account::Account;
use crate::context::Month;
use crate::engine::DecisionEngine;
use crate::error::{EngineError, Result};
use crate::evaluator::Evaluator;
use crate::history::DeterminationHistory;
use crate::money::Money;
use std::io::Write;
use std::str::FromStr;

/// Healthy balance used by the scenarios.
const HEALTHY_BALANCE: i64 = 15000;

/// Balance well under any sensible minimum.
const LOW_BALANCE: i64 = 500;

/// A named balance plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// 15,000 throughout. Never defaults.
    HappyPath,
    /// 15,000 except a single month at 500. Defaults once, never charged.
    SingleMonthDefault,
    /// 500 every month. Charged every second month.
    ConstantLowBalance,
    /// 500 for two months, then 15,000. Charged exactly once.
    Recovery,
    /// 7,000 every month: a 3,000 shortfall whose charge stays under the cap.
    BelowCap,
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Scenario::HappyPath,
        Scenario::SingleMonthDefault,
        Scenario::ConstantLowBalance,
        Scenario::Recovery,
        Scenario::BelowCap,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::HappyPath => "happy-path",
            Scenario::SingleMonthDefault => "single-month-default",
            Scenario::ConstantLowBalance => "constant-low-balance",
            Scenario::Recovery => "recovery",
            Scenario::BelowCap => "below-cap",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(Scenario::name).collect()
    }

    pub fn description(&self) -> &'static str {
        match self {
            Scenario::HappyPath => "balance 15000 maintained throughout",
            Scenario::SingleMonthDefault => "balance 15000 except month 2 at 500",
            Scenario::ConstantLowBalance => "balance 500 every month",
            Scenario::Recovery => "balance 500 in months 1-2, then 15000",
            Scenario::BelowCap => "balance 7000 every month",
        }
    }

    fn customer(&self) -> (&'static str, &'static str) {
        match self {
            Scenario::HappyPath => ("S1_HAPPY_001", "Happy Customer"),
            Scenario::SingleMonthDefault => ("S2_SINGLE_001", "Single Month Defaulter"),
            Scenario::ConstantLowBalance => ("S3_CHRONIC_001", "Chronic Defaulter"),
            Scenario::Recovery => ("S4_RECOVERY_001", "Recovery Customer"),
            Scenario::BelowCap => ("S5_SMALL_001", "Small Shortfall Customer"),
        }
    }

    /// Number of monthly cycles the scenario runs, starting at month 1.
    pub fn cycles(&self) -> Month {
        match self {
            Scenario::HappyPath => 4,
            Scenario::SingleMonthDefault => 3,
            Scenario::ConstantLowBalance => 7,
            Scenario::Recovery => 4,
            Scenario::BelowCap => 3,
        }
    }

    /// Daily balance held throughout `month`.
    pub fn balance_for(&self, month: Month) -> Money {
        let units = match self {
            Scenario::HappyPath => HEALTHY_BALANCE,
            Scenario::SingleMonthDefault if month == 2 => LOW_BALANCE,
            Scenario::SingleMonthDefault => HEALTHY_BALANCE,
            Scenario::ConstantLowBalance => LOW_BALANCE,
            Scenario::Recovery if month <= 2 => LOW_BALANCE,
            Scenario::Recovery => HEALTHY_BALANCE,
            Scenario::BelowCap => 7000,
        };
        Money::from(units)
    }

    /// A fresh ledger for `month`.
    pub fn account_for(&self, month: Month) -> Account {
        let (id, name) = self.customer();
        Account::with_constant_balance(id, name, self.balance_for(month))
    }

    /// Runs every cycle of the scenario.
    pub fn run(&self, engine: &DecisionEngine, min_balance: Money) -> Result<ScenarioOutcome> {
        let mut evaluator = Evaluator::new(engine.clone());

        for month in 1..=self.cycles() {
            let accounts = [self.account_for(month)];
            evaluator.run_cycle(month, &accounts, min_balance)?;
        }

        Ok(ScenarioOutcome {
            scenario: *self,
            min_balance,
            history: evaluator.into_history(),
        })
    }
}

impl FromStr for Scenario {
    type Err = EngineError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|scenario| scenario.name() == wanted)
            .ok_or_else(|| EngineError::UnknownScenario(s.to_string()))
    }
}

/// Determinations accumulated over a scenario run.
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub scenario: Scenario,
    pub min_balance: Money,
    pub history: DeterminationHistory,
}

impl ScenarioOutcome {
    /// Sum of all charges assessed during the run.
    pub fn total_charged(&self) -> Money {
        self.history.charges().iter().map(|c| c.total_charge).sum()
    }

    /// Number of warning SMS flagged during the run.
    pub fn sms_sent(&self) -> usize {
        self.history.probable().iter().filter(|p| p.sms_sent).count()
    }

    /// Writes a plain-text report of every determination, in the order made.
    pub fn write_summary<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(
            writer,
            "== {}: {} (minimum {})",
            self.scenario.name(),
            self.scenario.description(),
            self.min_balance
        )?;

        for p in self.history.probable() {
            writeln!(
                writer,
                "probable account={} month={} amb={} sms={} reason={:?}",
                p.account_id, p.month, p.amb, p.sms_sent, p.reason
            )?;
        }
        for a in self.history.actual() {
            writeln!(
                writer,
                "actual account={} month={} amb={} shortfall={}",
                a.account_id, a.month, a.amb, a.shortfall
            )?;
        }
        for c in self.history.charges() {
            writeln!(
                writer,
                "charge account={} months={}+{} charged_in={} base={} gst={} total={}",
                c.account_id,
                c.month1,
                c.month2,
                c.charged_in_month,
                c.base_charge,
                c.gst_amount,
                c.total_charge
            )?;
        }

        writeln!(
            writer,
            "summary probable={} actual={} charges={} sms_sent={} total_charged={}",
            self.history.probable().len(),
            self.history.actual().len(),
            self.history.charges().len(),
            self.sms_sent(),
            self.total_charged()
        )?;

        writer.flush()?;
        Ok(())
    }
}
