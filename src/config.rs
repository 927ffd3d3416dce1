//! Rule configuration: checkpoint days and charge constants.
//!
//! Defaults follow the bank's published schedule. Every value can be
//! overridden from the environment:
//!
//! | Variable                 | Default |
//! |--------------------------|---------|
//! | `AMB_PROBABLE_CHECK_DAY` | `25`    |
//! | `AMB_ACTUAL_CHECK_DAY`   | `3`     |
//! | `AMB_CHARGE_RATE`        | `0.06`  |
//! | `AMB_CHARGE_CAP`         | `500`   |
//! | `AMB_GST_RATE`           | `0.18`  |

use crate::account::DAYS_IN_CYCLE;
use crate::error::{EngineError, Result};
use crate::money::Money;
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

/// Tunable parameters of the decision rules.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleConfig {
    /// Day of the month on which probable defaulters are flagged.
    /// Some branches of the bank run this check on day 26.
    pub probable_check_day: u32,

    /// Day of the following month on which defaults are confirmed and charged.
    pub actual_check_day: u32,

    /// Fraction of the shortfall charged per defaulted month.
    pub charge_rate: Decimal,

    /// Upper bound on the base charge for a single month.
    pub charge_cap: Money,

    /// GST applied on top of each month's base charge.
    pub gst_rate: Decimal,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            probable_check_day: 25,
            actual_check_day: 3,
            charge_rate: Decimal::new(6, 2),
            charge_cap: Money::from(500),
            gst_rate: Decimal::new(18, 2),
        }
    }
}

impl RuleConfig {
    /// Loads the configuration from `AMB_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads the configuration through an arbitrary key lookup.
    ///
    /// Unset keys keep their default. Set but unparsable keys are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            probable_check_day: parse_var(&lookup, "AMB_PROBABLE_CHECK_DAY")?
                .unwrap_or(defaults.probable_check_day),
            actual_check_day: parse_var(&lookup, "AMB_ACTUAL_CHECK_DAY")?
                .unwrap_or(defaults.actual_check_day),
            charge_rate: parse_var(&lookup, "AMB_CHARGE_RATE")?.unwrap_or(defaults.charge_rate),
            charge_cap: parse_var(&lookup, "AMB_CHARGE_CAP")?.unwrap_or(defaults.charge_cap),
            gst_rate: parse_var(&lookup, "AMB_GST_RATE")?.unwrap_or(defaults.gst_rate),
        };

        config.validate()?;
        Ok(config)
    }

    /// Returns the configuration with a different probable checkpoint day.
    pub fn with_probable_check_day(mut self, day: u32) -> Result<Self> {
        self.probable_check_day = day;
        self.validate()?;
        Ok(self)
    }

    /// Checks that both checkpoints fall inside the cycle, that the actual
    /// checkpoint comes earlier in its month than the probable one, and that
    /// no rate or cap is negative.
    ///
    /// A cycle runs the probable checkpoint of month `m` and then the actual
    /// checkpoint of `m + 1`, so the next probable checkpoint must come after
    /// the actual one.
    pub fn validate(&self) -> Result<()> {
        for day in [self.probable_check_day, self.actual_check_day] {
            if day == 0 || day as usize > DAYS_IN_CYCLE {
                return Err(EngineError::InvalidCheckDay(day));
            }
        }

        if self.actual_check_day >= self.probable_check_day {
            return Err(EngineError::InvalidConfig {
                key: "AMB_ACTUAL_CHECK_DAY",
                message: format!(
                    "day {} must come before the probable check day {}",
                    self.actual_check_day, self.probable_check_day
                ),
            });
        }

        if self.charge_rate.is_sign_negative() && !self.charge_rate.is_zero() {
            return Err(negative("AMB_CHARGE_RATE"));
        }
        if self.charge_cap.is_negative() {
            return Err(negative("AMB_CHARGE_CAP"));
        }
        if self.gst_rate.is_sign_negative() && !self.gst_rate.is_zero() {
            return Err(negative("AMB_GST_RATE"));
        }

        Ok(())
    }
}

fn negative(key: &'static str) -> EngineError {
    EngineError::InvalidConfig {
        key,
        message: "must not be negative".to_string(),
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| EngineError::InvalidConfig {
                key,
                message: format!("cannot parse {:?}: {}", raw, e),
            }),
    }
}
