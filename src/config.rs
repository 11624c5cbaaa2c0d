//! Lending policy knobs.
//!
//! Every field has a default matching the library's published rules, so an
//! empty JSON object (or no policy file at all) yields the standard policy.

use crate::domain::money::Money;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tiered late-fee schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    /// Number of overdue days billed at `first_tier_daily`.
    pub grace_tier_days: i64,
    pub first_tier_daily: Money,
    /// Daily rate once `grace_tier_days` is exhausted.
    pub later_daily: Money,
    /// Maximum fee per borrowed book. Also bounds a single refund.
    pub cap: Money,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            grace_tier_days: 7,
            first_tier_daily: Money::new(dec!(0.50)),
            later_daily: Money::new(dec!(1.00)),
            cap: Money::new(dec!(15.00)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LendingPolicy {
    pub loan_period_days: i64,
    /// A borrow is refused only once the outstanding count is strictly greater
    /// than this value.
    pub max_outstanding_borrows: usize,
    pub fees: FeeSchedule,
}

impl Default for LendingPolicy {
    fn default() -> Self {
        Self {
            loan_period_days: 14,
            max_outstanding_borrows: 5,
            fees: FeeSchedule::default(),
        }
    }
}

impl LendingPolicy {
    /// Reads a policy from a JSON file. Missing fields fall back to defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
