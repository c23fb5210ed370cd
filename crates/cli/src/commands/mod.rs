//! CLI command implementations.

pub mod chat;
pub mod config_check;
