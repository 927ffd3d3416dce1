//! Checkpoint driver.
//!
//! Runs the [`DecisionEngine`] for every account at a checkpoint and folds the
//! results into the owned [`DeterminationHistory`]. All accounts at one
//! checkpoint see the same history snapshot; their results become visible
//! together once the checkpoint is complete.

use crate::account::Account;
use crate::context::{Checkpoint, ExecutionContext, Month};
use crate::engine::{DecisionEngine, Evaluation};
use crate::error::{EngineError, Result};
use crate::history::DeterminationHistory;
use crate::money::Money;
use log::{info, warn};
use std::collections::HashSet;

/// Drives checkpoints in chronological order.
///
/// # Ordering
///
/// Checkpoints must be run in non-decreasing `(month, day)` order. Running an
/// earlier checkpoint than the last one is rejected. Running the same
/// checkpoint again is allowed and produces no new records.
#[derive(Debug)]
pub struct Evaluator {
    engine: DecisionEngine,
    history: DeterminationHistory,
    last_checkpoint: Option<Checkpoint>,
}

impl Evaluator {
    /// Creates an evaluator with an empty history.
    pub fn new(engine: DecisionEngine) -> Self {
        Self::with_history(engine, DeterminationHistory::new())
    }

    /// Resumes from a previously persisted history.
    ///
    /// Chronology is only tracked for checkpoints run by this evaluator.
    pub fn with_history(engine: DecisionEngine, history: DeterminationHistory) -> Self {
        Evaluator {
            engine,
            history,
            last_checkpoint: None,
        }
    }

    pub fn history(&self) -> &DeterminationHistory {
        &self.history
    }

    pub fn into_history(self) -> DeterminationHistory {
        self.history
    }

    pub fn last_checkpoint(&self) -> Option<Checkpoint> {
        self.last_checkpoint
    }

    /// Evaluates all accounts at one checkpoint and records the results.
    ///
    /// If an account id appears more than once, only its first ledger is
    /// evaluated.
    pub fn run_checkpoint(
        &mut self,
        accounts: &[Account],
        context: &ExecutionContext,
    ) -> Result<Evaluation> {
        let checkpoint = context.checkpoint();
        if let Some(last) = self.last_checkpoint {
            if checkpoint < last {
                return Err(EngineError::OutOfOrderCheckpoint {
                    attempted: checkpoint,
                    last,
                });
            }
        }

        let mut seen = HashSet::new();
        let mut evaluation = Evaluation::default();

        for account in accounts {
            if !seen.insert(account.id.as_str()) {
                warn!(
                    "{}: duplicate account {}, ignoring",
                    checkpoint, account.id
                );
                continue;
            }
            evaluation.merge(self.engine.evaluate(account, context, &self.history));
        }

        info!(
            "{}: evaluated {} accounts, {} rules fired ({} probable, {} actual, {} charges)",
            checkpoint,
            seen.len(),
            evaluation.rules_fired(),
            evaluation.probable.len(),
            evaluation.actual.len(),
            evaluation.charges.len()
        );

        self.history.append(evaluation.clone());
        self.last_checkpoint = Some(checkpoint);
        Ok(evaluation)
    }

    /// Runs one monthly cycle for `month`: the probable checkpoint, then the
    /// actual/charge checkpoint early in `month + 1`.
    ///
    /// `accounts` hold the balances of `month`; they serve both checkpoints.
    pub fn run_cycle(
        &mut self,
        month: Month,
        accounts: &[Account],
        min_balance: Money,
    ) -> Result<Evaluation> {
        let next_month = month
            .checked_add(1)
            .ok_or(EngineError::MonthOutOfRange(month))?;
        let config = self.engine.config();
        let probable = ExecutionContext::new(month, config.probable_check_day, min_balance);
        let confirm = ExecutionContext::new(next_month, config.actual_check_day, min_balance);

        let mut evaluation = self.run_checkpoint(accounts, &probable)?;
        evaluation.merge(self.run_checkpoint(accounts, &confirm)?);
        Ok(evaluation)
    }
}
