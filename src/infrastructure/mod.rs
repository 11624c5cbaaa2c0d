//! Adapters implementing the domain ports.

pub mod gateway;
pub mod in_memory;
