//! Application layer
//!
//! This layer contains use cases that orchestrate domain logic to implement
//! application-specific workflows.

pub mod withdrawal;
