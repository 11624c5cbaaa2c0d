//! Late-fee policy.
//!
//! A pure function of a due date, the instant being assessed, and the fee
//! schedule. Nothing here reads the clock.

use super::money::Money;
use crate::config::FeeSchedule;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeStatus {
    OnTime,
    Overdue,
}

/// The late fee owed for one borrow record at one instant. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeeAssessment {
    pub fee_amount: Money,
    pub days_overdue: i64,
    pub status: FeeStatus,
}

impl FeeAssessment {
    pub fn none() -> Self {
        Self {
            fee_amount: Money::ZERO,
            days_overdue: 0,
            status: FeeStatus::OnTime,
        }
    }
}

/// Whole days past `due_at`, floored, never negative.
pub fn days_overdue(due_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - due_at).num_days().max(0)
}

/// Fee for a number of overdue days: the first tier is billed at the lower
/// daily rate, every later day at the higher one, and the total is capped.
pub fn fee_for_days(days: i64, schedule: &FeeSchedule) -> Money {
    if days <= 0 {
        return Money::ZERO;
    }
    let first_tier = days.min(schedule.grace_tier_days);
    let later = days - first_tier;
    let fee = schedule.first_tier_daily * first_tier + schedule.later_daily * later;
    fee.min(schedule.cap)
}

pub fn assess(due_at: DateTime<Utc>, now: DateTime<Utc>, schedule: &FeeSchedule) -> FeeAssessment {
    let days = days_overdue(due_at, now);
    FeeAssessment {
        fee_amount: fee_for_days(days, schedule),
        days_overdue: days,
        status: if days > 0 {
            FeeStatus::Overdue
        } else {
            FeeStatus::OnTime
        },
    }
}
