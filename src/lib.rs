//! # AMB Engine
//!
//! Detects accounts that fail to maintain their Average Monthly Balance (AMB)
//! and assesses non-maintenance charges.
//!
//! ## Design Principles
//!
//! - **Pure rules**: [`DecisionEngine::evaluate`] depends only on its inputs
//! - **Caller-owned state**: history is passed in and returned, never stored
//! - **Idempotent checkpoints**: re-running a checkpoint adds nothing
//! - **Exact arithmetic**: amounts use `rust_decimal`
//!
//! ## Monthly Cycle
//!
//! | Checkpoint          | Rule     | Outcome                                    |
//! |---------------------|----------|--------------------------------------------|
//! | day 25 of month N   | Probable | AMB(1..25)/30 below minimum, SMS if new    |
//! | day 3 of month N+1  | Actual   | AMB(1..30)/30 of month N below minimum     |
//! | day 3 of month N+1  | Charge   | months N-1 and N both confirmed, uncharged |
//!
//! ## Example
//!
//! ```
//! use amb_engine::{Account, DecisionEngine, Evaluator, Money};
//!
//! let mut evaluator = Evaluator::new(DecisionEngine::default());
//! let minimum = Money::from(10000);
//!
//! for month in 1..=2 {
//!     let ledger = Account::with_constant_balance("ACC-1", "Jane Doe", Money::from(500));
//!     evaluator.run_cycle(month, &[ledger], minimum).unwrap();
//! }
//!
//! let charges = evaluator.history().charges();
//! assert_eq!(charges.len(), 1);
//! assert_eq!(charges[0].total_charge.to_string(), "1180.00");
//! ```

pub mod account;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod history;
pub mod money;
pub mod record;
pub mod scenario;

pub use account::{Account, DAYS_IN_CYCLE};
pub use config::RuleConfig;
pub use context::{Checkpoint, ExecutionContext, Month};
pub use engine::{DecisionEngine, Evaluation};
pub use error::{EngineError, Result};
pub use evaluator::Evaluator;
pub use history::DeterminationHistory;
pub use money::Money;
pub use record::{ActualDefaulterRecord, ChargeRecord, MonthlyCharge, ProbableDefaulterRecord};
pub use scenario::{Scenario, ScenarioOutcome};
