//! Time-based derived state for due items.
//!
//! # Responsibility
//! - Classify due timestamps against a clock reading.
//! - Decide when the passive periodic refresh should run.
//!
//! # Invariants
//! - Nothing here mutates the list; all functions are pure or read-only.

pub mod clock;
pub mod refresh;
pub mod time_status;
