//! Daily usage alert widget.
//!
//! Compares the water used today against the daily quota and picks one of
//! three alert levels.

use crate::error::{AquaError, Result};
use std::fmt;

/// Litres used today when no reading is available.
pub const DEFAULT_USED_TODAY: f64 = 120.0;

/// Default daily quota in litres.
pub const DEFAULT_DAILY_QUOTA: f64 = 150.0;

/// Upper bound (inclusive) of the safe band, in percent of quota.
const SAFE_PERCENT: f64 = 60.0;

/// Upper bound (inclusive) of the warning band, in percent of quota.
const WARNING_PERCENT: f64 = 90.0;

/// Severity of the usage alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Safe,
    Warning,
    Exceeded,
}

impl AlertLevel {
    /// Returns the string representation of the level.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Safe => "safe",
            AlertLevel::Warning => "warning",
            AlertLevel::Exceeded => "exceeded",
        }
    }

    /// Message shown to the user for this level.
    pub fn message(&self) -> &'static str {
        match self {
            AlertLevel::Safe => "You're within safe usage limits.",
            AlertLevel::Warning => "Approaching your daily water limit.",
            AlertLevel::Exceeded => "You've exceeded your daily water limit!",
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Evaluated usage alert.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageAlert {
    /// Litres used today.
    pub used_today: f64,

    /// Daily quota in litres.
    pub daily_quota: f64,

    /// Share of the quota used, in percent.
    pub percentage: f64,

    /// Alert severity.
    pub level: AlertLevel,
}

impl UsageAlert {
    /// Evaluates today's usage against the quota.
    ///
    /// # Errors
    ///
    /// Returns `AquaError::InvalidQuota` if the quota is not a positive,
    /// finite number.
    pub fn evaluate(used_today: f64, daily_quota: f64) -> Result<Self> {
        if !daily_quota.is_finite() || daily_quota <= 0.0 {
            return Err(AquaError::InvalidQuota(daily_quota));
        }

        let percentage = used_today / daily_quota * 100.0;
        let level = if percentage <= SAFE_PERCENT {
            AlertLevel::Safe
        } else if percentage <= WARNING_PERCENT {
            AlertLevel::Warning
        } else {
            AlertLevel::Exceeded
        };

        Ok(Self {
            used_today,
            daily_quota,
            percentage,
            level,
        })
    }

    /// Percentage formatted with one decimal, e.g. `"80.0"`.
    pub fn percentage_display(&self) -> String {
        format!("{:.1}", self.percentage)
    }
}

impl Default for UsageAlert {
    fn default() -> Self {
        Self {
            used_today: DEFAULT_USED_TODAY,
            daily_quota: DEFAULT_DAILY_QUOTA,
            percentage: DEFAULT_USED_TODAY / DEFAULT_DAILY_QUOTA * 100.0,
            level: AlertLevel::Warning,
        }
    }
}
