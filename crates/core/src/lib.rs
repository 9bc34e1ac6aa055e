//! Shared domain types and errors for the taskflow workspace.

pub mod error;
pub mod types;
