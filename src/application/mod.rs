//! Application layer orchestrating the lending desk.
//!
//! `LendingEngine` owns the stores and runs the borrow/return lifecycle.
//! `FeeSettlement` and `StatusReporter` borrow the engine to collect fees
//! through a payment gateway and to summarise a patron's account.

pub mod lending;
pub mod reporting;
pub mod settlement;
