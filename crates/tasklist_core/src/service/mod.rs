//! Core use-case services.
//!
//! # Responsibility
//! - Own list state and route UI events into it.
//! - Keep renderers decoupled from storage details.

pub mod engine;
pub mod list_service;
pub mod reorder;
