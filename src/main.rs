//! AMB Engine CLI
//!
//! Runs the built-in balance scenarios and prints every determination made.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- all
//! cargo run -- constant-low-balance --min-balance 10000 --probable-day 26
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `info` to control logging verbosity
//! - `AMB_*`: Rule configuration, see `amb_engine::config`

use amb_engine::{DecisionEngine, EngineError, Money, Result, RuleConfig, Scenario};
use std::env;
use std::io;
use std::process;
use std::str::FromStr;

/// Minimum balance used when `--min-balance` is not given.
const DEFAULT_MIN_BALANCE: i64 = 10000;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let options = Options::parse(&args)?;

    let mut config = RuleConfig::from_env()?;
    if let Some(day) = options.probable_day {
        config = config.with_probable_check_day(day)?;
    }
    let engine = DecisionEngine::new(config);

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for scenario in &options.scenarios {
        let outcome = scenario.run(&engine, options.min_balance)?;
        outcome.write_summary(&mut handle)?;
    }

    Ok(())
}

/// Parsed command line.
#[derive(Debug)]
struct Options {
    scenarios: Vec<Scenario>,
    min_balance: Money,
    probable_day: Option<u32>,
}

impl Options {
    fn parse(args: &[String]) -> Result<Self> {
        let mut scenarios = None;
        let mut min_balance = Money::from(DEFAULT_MIN_BALANCE);
        let mut probable_day = None;

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--min-balance" => {
                    let value = iter
                        .next()
                        .ok_or_else(|| EngineError::InvalidArgument(arg.clone()))?;
                    min_balance = parse_amount(value)?;
                }
                "--probable-day" => {
                    let value = iter
                        .next()
                        .ok_or_else(|| EngineError::InvalidArgument(arg.clone()))?;
                    let day = value
                        .parse::<u32>()
                        .map_err(|_| EngineError::InvalidArgument(value.clone()))?;
                    probable_day = Some(day);
                }
                flag if flag.starts_with("--") => {
                    return Err(EngineError::InvalidArgument(flag.to_string()));
                }
                "all" if scenarios.is_none() => scenarios = Some(Scenario::ALL.to_vec()),
                name if scenarios.is_none() => scenarios = Some(vec![Scenario::from_str(name)?]),
                extra => return Err(EngineError::InvalidArgument(extra.to_string())),
            }
        }

        Ok(Options {
            scenarios: scenarios.ok_or(EngineError::MissingArgument)?,
            min_balance,
            probable_day,
        })
    }
}

fn parse_amount(value: &str) -> Result<Money> {
    let amount = Money::from_str(value).map_err(|e| EngineError::InvalidAmount {
        value: value.to_string(),
        message: e.to_string(),
    })?;
    if amount.is_negative() {
        return Err(EngineError::InvalidAmount {
            value: value.to_string(),
            message: "must not be negative".to_string(),
        });
    }
    Ok(amount)
}
