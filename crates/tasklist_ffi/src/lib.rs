//! Flutter bridge surface for the list core.

pub mod api;
