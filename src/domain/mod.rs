//! Domain types and the ports the application layer talks through.

pub mod book;
pub mod fee;
pub mod loan;
pub mod money;
pub mod patron;
pub mod payment;
pub mod ports;
