//! Driving adapters: CSV readers and writers plus the command runner used by the binary.

pub mod csv;
pub mod runner;
