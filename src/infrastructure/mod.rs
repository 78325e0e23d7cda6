//! Infrastructure layer
//!
//! Configuration loading and the in-memory adapters implementing the
//! withdrawal ports.

pub mod config;
pub mod in_memory;
