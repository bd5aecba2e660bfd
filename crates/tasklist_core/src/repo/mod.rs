//! Repository layer for list persistence.
//!
//! # Responsibility
//! - Define the whole-collection storage contract used by the list model.
//! - Keep SQLite and JSON encoding details out of service code.
//!
//! # Invariants
//! - Read paths reject invalid persisted state instead of masking it, then
//!   degrade to an empty collection at the `load` boundary.

pub mod item_store;
