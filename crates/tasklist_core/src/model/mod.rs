//! List domain model.
//!
//! # Responsibility
//! - Define the item record and its persisted shape.
//! - Define the filter modes shared by list views.
//!
//! # Invariants
//! - Every item is identified by a stable `ItemId`.
//! - Deletion is a hard remove; there is no tombstone state.

pub mod filter;
pub mod item;
