//! Error types for the AMB engine.
//!
//! Rule evaluation itself never fails: malformed balances degrade to a zero
//! AMB and duplicate assessments are silent no-ops. Errors only arise from
//! configuration, command-line input and checkpoint sequencing.

use crate::context::{Checkpoint, Month};
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur outside of rule evaluation.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to write output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration value could not be used
    #[error("Invalid configuration {key}: {message}")]
    InvalidConfig { key: &'static str, message: String },

    /// A checkpoint day outside the 30-day cycle
    #[error("Invalid check day {0}: must be between 1 and 30")]
    InvalidCheckDay(u32),

    /// A monetary amount could not be parsed
    #[error("Invalid amount {value:?}: {message}")]
    InvalidAmount { value: String, message: String },

    /// A checkpoint was run before one that had already been evaluated
    #[error("Checkpoint {attempted} is earlier than already evaluated {last}")]
    OutOfOrderCheckpoint {
        attempted: Checkpoint,
        last: Checkpoint,
    },

    /// A monthly cycle whose confirmation month cannot be represented
    #[error("Month {0} has no following month")]
    MonthOutOfRange(Month),

    /// Unknown scenario name on the command line
    #[error("Unknown scenario {0:?}. Expected one of: {}", crate::scenario::Scenario::names().join(", "))]
    UnknownScenario(String),

    /// Missing scenario argument
    #[error("Missing scenario argument. Usage: amb-engine <scenario|all> [--min-balance N] [--probable-day D]")]
    MissingArgument,

    /// Unrecognised or incomplete command-line option
    #[error("Invalid argument {0:?}")]
    InvalidArgument(String),
}
