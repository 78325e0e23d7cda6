pub mod withdrawal;

// Re-export withdrawal module for easier access
pub use withdrawal::*;
